//! Terminal output helpers: styled prints and the poll spinner.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a poll session runs.
pub fn poll_spinner(job_id: &str) -> ProgressBar {
    let spinner_style = ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .expect("progress bar template is a valid static string");

    let bar = ProgressBar::new_spinner();
    bar.set_style(spinner_style);
    bar.set_message(format!("Waiting on deploy {job_id}..."));
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub fn success(message: &str) {
    println!("{}", style(message).green());
}

pub fn failure(message: &str) {
    eprintln!("{}", style(message).red());
}

pub fn note(message: &str) {
    println!("{}", style(message).dim());
}
