use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::executor::{ItemOutcome, ProgressReporter};
use crate::format;

const BAR_WIDTH: usize = 30;

/// Redraws a single `[████░░░░] 42.0% (5/12)` line on stderr as items finish.
///
/// When stderr is not a terminal indicatif hides the bar, so item lines and
/// the final bar go straight to stderr instead.
#[derive(Default)]
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn start_with(&mut self, bar: ProgressBar, total: usize) {
        let style = ProgressStyle::with_template("{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_message(format::progress_bar(0, total, BAR_WIDTH));
        self.bar = Some(bar);
    }
}

fn item_line(name: &str, outcome: &ItemOutcome) -> String {
    match outcome {
        ItemOutcome::Success => format!("  {} {}", "✓".green(), name),
        ItemOutcome::Failure(message) => format!("  {} {}: {}", "✗".red(), name, message),
    }
}

fn emit(bar: &ProgressBar, line: String) {
    if bar.is_hidden() {
        eprintln!("{}", line);
    } else {
        bar.println(line);
    }
}

impl ProgressReporter for ConsoleProgress {
    fn start(&mut self, total: usize) {
        self.start_with(ProgressBar::new(total as u64), total);
    }

    fn item_done(&mut self, done: usize, total: usize, name: &str, outcome: &ItemOutcome) {
        let Some(bar) = &self.bar else {
            return;
        };
        emit(bar, item_line(name, outcome));
        bar.set_position(done as u64);
        bar.set_message(format::progress_bar(done, total, BAR_WIDTH));
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            let total = bar.length().unwrap_or(0) as usize;
            let line = format::progress_bar(bar.position() as usize, total, BAR_WIDTH);
            if bar.is_hidden() {
                eprintln!("{}", line);
            }
            bar.finish_with_message(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_lines() {
        let ok = item_line("a", &ItemOutcome::Success);
        assert!(ok.contains('✓') && ok.ends_with(" a"));

        let failed = item_line("b", &ItemOutcome::Failure("HTTP 404: Not Found".to_string()));
        assert!(failed.contains('✗'));
        assert!(failed.ends_with(" b: HTTP 404: Not Found"));
    }

    #[test]
    fn test_hidden_bar_tracks_progress() {
        let mut progress = ConsoleProgress::new();
        let bar = ProgressBar::hidden();
        bar.set_length(3);
        progress.start_with(bar, 3);

        progress.item_done(1, 3, "a", &ItemOutcome::Success);
        progress.item_done(2, 3, "b", &ItemOutcome::Failure("boom".to_string()));

        let bar = progress.bar.as_ref().unwrap();
        assert!(bar.is_hidden());
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.message(), format::progress_bar(2, 3, BAR_WIDTH));

        progress.finish();
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_item_done_before_start_is_ignored() {
        let mut progress = ConsoleProgress::new();
        progress.item_done(1, 1, "a", &ItemOutcome::Success);
        progress.finish();
        assert!(progress.bar.is_none());
    }
}
