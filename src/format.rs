use crate::executor::{BatchAction, BatchResult};
use crate::prompt::Choice;
use crate::snapshot::RepositoryRecord;

const NAME_WIDTH: usize = 32;
const VISIBILITY_WIDTH: usize = 12;
const LANGUAGE_WIDTH: usize = 14;
const SIZE_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    /// Most recently updated first
    #[default]
    Updated,
    /// Alphabetical, case-insensitive
    Name,
    /// Largest first
    Size,
}

/// Stable sort, so equal keys keep snapshot order
pub fn sort_records(records: &mut [RepositoryRecord], key: SortKey) {
    match key {
        SortKey::Updated => records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortKey::Name => records.sort_by_key(|r| r.name.to_lowercase()),
        SortKey::Size => records.sort_by(|a, b| b.size_kb.cmp(&a.size_kb)),
    }
}

pub fn filter_by_name(records: &[RepositoryRecord], needle: &str) -> Vec<RepositoryRecord> {
    let needle = needle.trim().to_lowercase();
    records
        .iter()
        .filter(|r| needle.is_empty() || r.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub fn format_size(size_kb: u64) -> String {
    const KB_PER_MB: f64 = 1024.0;
    const KB_PER_GB: f64 = 1024.0 * 1024.0;

    let kb = size_kb as f64;
    if kb >= KB_PER_GB {
        format!("{:.1} GB", kb / KB_PER_GB)
    } else if kb >= KB_PER_MB {
        format!("{:.1} MB", kb / KB_PER_MB)
    } else {
        format!("{} KB", size_kb)
    }
}

pub fn visibility_glyph(is_private: bool) -> &'static str {
    if is_private { "🔒 private" } else { "🌐 public" }
}

/// `[████░░░░] 42.0% (5/12)`
pub fn progress_bar(done: usize, total: usize, width: usize) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        (done.min(total) as f64) / (total as f64)
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);

    format!(
        "[{}{}] {:.1}% ({}/{})",
        "█".repeat(filled),
        "░".repeat(width - filled),
        ratio * 100.0,
        done,
        total
    )
}

pub fn choice_label(record: &RepositoryRecord) -> String {
    format!(
        "{} ({}, {}, {})",
        record.name,
        visibility_glyph(record.is_private),
        record.language,
        format_size(record.size_kb)
    )
}

pub fn choices(records: &[RepositoryRecord]) -> Vec<Choice> {
    records
        .iter()
        .map(|r| Choice::new(r.name.clone(), choice_label(r)))
        .collect()
}

pub fn format_table(records: &[RepositoryRecord]) -> String {
    if records.is_empty() {
        return "No repositories found.\n".to_string();
    }

    let border = |left: &str, mid: &str, right: &str| {
        format!(
            "{}{}{}{}{}{}{}{}{}\n",
            left,
            "─".repeat(NAME_WIDTH + 2),
            mid,
            "─".repeat(VISIBILITY_WIDTH + 2),
            mid,
            "─".repeat(LANGUAGE_WIDTH + 2),
            mid,
            "─".repeat(SIZE_WIDTH + 2),
            right
        )
    };
    let row = |name: &str, visibility: &str, language: &str, size: &str| {
        format!(
            "│ {} │ {} │ {} │ {} │\n",
            pad(name, NAME_WIDTH),
            pad(visibility, VISIBILITY_WIDTH),
            pad(language, LANGUAGE_WIDTH),
            pad_left(size, SIZE_WIDTH)
        )
    };

    let mut output = String::new();
    output.push_str(&border("┌", "┬", "┐"));
    output.push_str(&row("Name", "Visibility", "Language", "Size"));
    output.push_str(&border("├", "┼", "┤"));
    for record in records {
        output.push_str(&row(
            &truncate_string(&record.name, NAME_WIDTH),
            visibility_glyph(record.is_private),
            &truncate_string(&record.language, LANGUAGE_WIDTH),
            &format_size(record.size_kb),
        ));
    }
    output.push_str(&border("└", "┴", "┘"));

    let private = records.iter().filter(|r| r.is_private).count();
    output.push_str(&format!(
        "{} repositories ({} public, {} private)\n",
        records.len(),
        records.len() - private,
        private
    ));
    output
}

pub fn format_summary(action: BatchAction, result: &BatchResult) -> String {
    format!(
        "{} complete: {} succeeded, {} failed",
        action.noun(),
        result.succeeded(),
        result.failed()
    )
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Emoji glyphs take two columns
fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| if (c as u32) >= 0x1F300 { 2 } else { 1 })
        .sum()
}

fn pad(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(display_width(s))))
}

fn pad_left(s: &str, width: usize) -> String {
    format!("{}{}", " ".repeat(width.saturating_sub(display_width(s))), s)
}
