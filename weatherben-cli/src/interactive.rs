//! Menu-driven session: news strip once, then search/history until quit.

use std::fmt;

use inquire::{InquireError, Select, Text};
use weatherben_core::{DisplayMode, HistoryEntry, WeatherApp, ticker};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Search,
    Clear,
    History,
    ToggleDisplay,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 5] = [
        MenuItem::Search,
        MenuItem::Clear,
        MenuItem::History,
        MenuItem::ToggleDisplay,
        MenuItem::Quit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::Search => "Search",
            MenuItem::Clear => "Clear",
            MenuItem::History => "Search history",
            MenuItem::ToggleDisplay => "Toggle light/dark",
            MenuItem::Quit => "Quit",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryAction {
    SearchAgain,
    Delete,
    Back,
}

impl fmt::Display for EntryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryAction::SearchAgain => "Search again",
            EntryAction::Delete => "Delete",
            EntryAction::Back => "Back",
        })
    }
}

/// History entry as a select option.
struct EntryChoice(HistoryEntry);

impl fmt::Display for EntryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::history_label(&self.0))
    }
}

pub async fn run(app: &mut WeatherApp) -> anyhow::Result<()> {
    apply_theme(app.display_mode());
    println!("{}", render::header(app.display_mode()));

    let news = ticker::fetch_news(app.provider()).await;
    println!("{}\n", ticker::format_strip(&news));

    loop {
        let menu = Select::new("What next?", MenuItem::ALL.to_vec());
        let Some(choice) = optional(menu.prompt())? else {
            break;
        };

        match choice {
            MenuItem::Search => search(app).await?,
            MenuItem::Clear => {
                app.handle_clear();
                println!("Cleared.");
            }
            MenuItem::History => history(app).await?,
            MenuItem::ToggleDisplay => {
                let mode = app.toggle_display_mode();
                apply_theme(mode);
                println!("{}", render::header(mode));
            }
            MenuItem::Quit => break,
        }
    }

    Ok(())
}

async fn search(app: &mut WeatherApp) -> anyhow::Result<()> {
    let Some(city) = optional(Text::new("City:").with_initial_value(&app.city).prompt())? else {
        return Ok(());
    };
    let Some(country) = optional(
        Text::new("Country code:")
            .with_initial_value(&app.country)
            .with_help_message("optional, e.g. TH")
            .prompt(),
    )?
    else {
        return Ok(());
    };

    app.set_input(city, country);
    // failures are shown through app.error()
    let _ = app.handle_search().await;
    println!("{}\n", render::lookup_result(app));

    Ok(())
}

async fn history(app: &mut WeatherApp) -> anyhow::Result<()> {
    if app.history().is_empty() {
        println!("{}", render::history(app.history()));
        return Ok(());
    }

    let options: Vec<EntryChoice> = app.history().iter().cloned().map(EntryChoice).collect();
    let Some(EntryChoice(entry)) = optional(Select::new("Search history", options).prompt())?
    else {
        return Ok(());
    };

    let actions = vec![EntryAction::SearchAgain, EntryAction::Delete, EntryAction::Back];
    let label = render::history_label(&entry);
    let Some(action) = optional(Select::new(&label, actions).prompt())? else {
        return Ok(());
    };

    match action {
        EntryAction::SearchAgain => {
            let _ = app.handle_history_search(&entry).await;
            println!("{}\n", render::lookup_result(app));
        }
        EntryAction::Delete => {
            app.handle_delete_history(entry.id);
            println!("Deleted {}, {}.", entry.city, entry.country);
        }
        EntryAction::Back => {}
    }

    Ok(())
}

fn apply_theme(mode: DisplayMode) {
    inquire::set_global_render_config(render::theme(mode));
}

/// Esc and Ctrl-C step back instead of failing.
fn optional<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_not_an_error() {
        let res: Result<String, InquireError> = Err(InquireError::OperationCanceled);
        assert!(optional(res).unwrap().is_none());

        let res: Result<String, InquireError> = Err(InquireError::OperationInterrupted);
        assert!(optional(res).unwrap().is_none());
    }

    #[test]
    fn other_prompt_errors_propagate() {
        let res: Result<String, InquireError> = Err(InquireError::NotTTY);
        assert!(optional(res).is_err());
    }

    #[test]
    fn menu_ends_with_quit() {
        assert_eq!(MenuItem::ALL.last(), Some(&MenuItem::Quit));
        assert_eq!(MenuItem::ToggleDisplay.to_string(), "Toggle light/dark");
    }
}
