// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Terminal progress reporting.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner:.yellow} [{elapsed_precise}] {msg}";
const BAR_TEMPLATE: &str = "{msg} | {bar:40.cyan/blue} | {percent}% || {pos}/{len}";
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Factory for spinners and bars that can be switched off as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    enabled: bool
}

impl Progress {
    /// Creates a factory drawing to the terminal when `enabled` is `true`.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled
        }
    }

    /// Creates a factory whose indicators are never drawn.
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Returns `true` when indicators are drawn.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Starts a spinner showing `message`.
    pub fn spinner<M>(&self, message: M) -> ProgressBar
    where
        M: Into<String>
    {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.into());
        spinner.enable_steady_tick(TICK_INTERVAL);
        spinner
    }

    /// Creates a bar of `length` steps labelled with `label`.
    pub fn bar<L>(&self, length: u64, label: L) -> ProgressBar
    where
        L: Into<String>
    {
        if !self.enabled {
            let bar = ProgressBar::hidden();
            bar.set_length(length);
            return bar;
        }

        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(length).with_style(style);
        bar.set_message(label.into());
        bar
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_bar_still_counts() {
        let bar = Progress::hidden().bar(3, "Downloading icons");
        bar.inc(1);
        bar.inc(1);
        assert!(bar.is_hidden());
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.length(), Some(3));
    }

    #[test]
    fn hidden_spinner_is_not_drawn() {
        let progress = Progress::hidden();
        assert!(!progress.is_enabled());
        assert!(progress.spinner("Fetching document").is_hidden());
    }

    #[test]
    fn templates_parse() {
        assert!(ProgressStyle::default_spinner().template(SPINNER_TEMPLATE).is_ok());
        assert!(ProgressStyle::default_bar().template(BAR_TEMPLATE).is_ok());
    }
}
