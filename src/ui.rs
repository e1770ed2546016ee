// UI layer: the numbered main menu. Prompts go through `dialoguer`, the
// work is done by `commands::App`, and every command's output is printed
// before the menu is shown again.

use crate::commands::{App, MenuChoice};
use anyhow::Result;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::error;

/// Main interactive menu. Runs until the user picks "Exit". Command
/// failures are printed and the loop continues; only a broken terminal
/// ends it with an error.
pub fn main_menu(app: &App) -> Result<()> {
    loop {
        println!("\nMovie Application");
        for choice in MenuChoice::ALL {
            println!("{}", choice);
        }

        let input: String = Input::new()
            .with_prompt("Enter your choice (0-9)")
            .interact_text()?;
        let choice = match MenuChoice::parse(&input) {
            Some(choice) => choice,
            None => {
                println!("Invalid choice. Please try again.");
                continue;
            }
        };

        let output = match choice {
            MenuChoice::Exit => {
                println!("Exiting the application.");
                break;
            }
            MenuChoice::List => app.list(),
            MenuChoice::Add => {
                let title = prompt_title("Enter the movie title")?;
                Ok(with_spinner("Looking up movie...", || app.add(&title)))
            }
            MenuChoice::Delete => {
                let title = prompt_title("Enter the title of the movie to delete")?;
                app.delete(&title)
            }
            MenuChoice::Update => Ok(app.update()),
            MenuChoice::Stats => app.stats(),
            MenuChoice::Random => app.random(),
            MenuChoice::Search => {
                let title = prompt_title("Enter the title of the movie to search")?;
                app.search(&title)
            }
            MenuChoice::SortedByRating => app.sorted_by_rating(),
            MenuChoice::GenerateWebsite => app.generate_website(),
        };

        match output {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!(command = choice.label(), error = %e, "command failed");
                println!("{} failed: {:#}", choice.label(), e);
            }
        }
    }
    Ok(())
}

fn prompt_title(prompt: &str) -> Result<String> {
    let title: String = Input::new().with_prompt(prompt).interact_text()?;
    Ok(title.trim().to_string())
}

/// Show an indicatif spinner while `work` blocks.
fn with_spinner<T>(message: &'static str, work: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = work();
    spinner.finish_and_clear();
    result
}
