//! Fetch the tasks of a day from a task service, print them, and save them as CSV
//!
//! Usage: `cargo run --example export-day [YYYY-MM-DD]`.
//! The service is configured with the `TASKBOARD_*` environment variables (see `taskboard::settings`).

use chrono::NaiveDate;

use taskboard::client::Client;
use taskboard::export::{Export, RowDate};
use taskboard::settings::Settings;
use taskboard::TaskStore;

#[tokio::main]
async fn main() {
    env_logger::init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Invalid settings: {}", err);
            std::process::exit(1);
        }
    };
    let client = match Client::new(settings) {
        Ok(client) => client,
        Err(err) => {
            log::error!("Unable to create a client: {}", err);
            std::process::exit(1);
        }
    };

    let store = TaskStore::for_today(client);
    if let Some(arg) = std::env::args().nth(1) {
        match NaiveDate::parse_from_str(&arg, "%Y-%m-%d") {
            Ok(date) => { store.set_date(date).await; },
            Err(err) => {
                log::error!("Invalid date {:?}: {}", arg, err);
                std::process::exit(1);
            }
        }
    } else {
        store.load_tasks().await;
    }

    println!("---- Tasks of {} -----", store.selected_date());
    for task in store.tasks() {
        let completion = if task.completed() { "✓" } else { " " };
        println!("    {} [{}] {}\t{}", completion, task.priority(), task.title(), task.id());
    }

    match store.export_csv(RowDate::SelectedDate) {
        Export::NothingToExport => println!("Nothing to export."),
        Export::Csv(file) => match std::fs::write(&file.file_name, &file.content) {
            Ok(()) => println!("Saved {}", file.file_name),
            Err(err) => log::error!("Unable to save {}: {}", file.file_name, err),
        },
    }
}
