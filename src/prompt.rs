//! Operator prompts.
//!
//! The engine only sees the [`Prompter`] trait. [`TerminalPrompter`] draws
//! arrow-key lists with `crossterm` and reads plain lines for text answers.

use colored::Colorize;
use crossterm::cursor::{Hide, MoveToColumn, MoveUp, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use std::io::{self, BufRead, Write};

use crate::error::{RepotidyError, Result};

const MAX_VISIBLE_ROWS: usize = 15;

/// One selectable entry: `value` is returned, `label` is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

pub trait Prompter {
    /// `None` when the operator backs out.
    fn select_one(&mut self, message: &str, choices: &[Choice]) -> Result<Option<String>>;

    /// Empty when nothing is picked.
    fn select_many(&mut self, message: &str, choices: &[Choice]) -> Result<Vec<String>>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    fn prompt_text(&mut self, message: &str) -> Result<String>;
}

#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> Result<String> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(RepotidyError::Prompt("input stream closed".to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Prompter for TerminalPrompter {
    fn select_one(&mut self, message: &str, choices: &[Choice]) -> Result<Option<String>> {
        let picked = ListPrompt::new(message, choices, false).run()?;
        Ok(picked.and_then(|idx| idx.first().map(|&i| choices[i].value.clone())))
    }

    fn select_many(&mut self, message: &str, choices: &[Choice]) -> Result<Vec<String>> {
        let picked = ListPrompt::new(message, choices, true).run()?;
        Ok(picked
            .unwrap_or_default()
            .into_iter()
            .map(|i| choices[i].value.clone())
            .collect())
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        print!("{} {} {} ", "?".green().bold(), message.bold(), hint.dimmed());
        io::stdout().flush()?;

        let answer = self.read_line()?;
        Ok(parse_yes_no(&answer).unwrap_or(default))
    }

    fn prompt_text(&mut self, message: &str) -> Result<String> {
        print!("{} {} ", "?".green().bold(), message.bold());
        io::stdout().flush()?;
        self.read_line()
    }
}

pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// First visible row so that `cursor` stays inside a window of `height` rows.
pub fn window_start(len: usize, cursor: usize, height: usize) -> usize {
    if len <= height {
        return 0;
    }
    let half = height / 2;
    cursor.saturating_sub(half).min(len - height)
}

/// Restores the terminal even when the prompt errors out.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show);
        let _ = terminal::disable_raw_mode();
    }
}

struct ListPrompt<'a> {
    message: &'a str,
    choices: &'a [Choice],
    multi: bool,
    cursor: usize,
    checked: Vec<bool>,
    drawn_rows: u16,
}

impl<'a> ListPrompt<'a> {
    fn new(message: &'a str, choices: &'a [Choice], multi: bool) -> Self {
        Self {
            message,
            choices,
            multi,
            cursor: 0,
            checked: vec![false; choices.len()],
            drawn_rows: 0,
        }
    }

    fn run(mut self) -> Result<Option<Vec<usize>>> {
        if self.choices.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let _guard = RawModeGuard::enable()?;
        let mut out = io::stdout();
        self.draw(&mut out)?;

        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match self.handle_key(key) {
                KeyOutcome::Continue => self.draw(&mut out)?,
                KeyOutcome::Cancel => {
                    self.clear(&mut out)?;
                    return Ok(None);
                }
                KeyOutcome::Submit => {
                    self.clear(&mut out)?;
                    let picked = self.picked();
                    let summary = picked
                        .iter()
                        .map(|&i| self.choices[i].value.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    let line = format!(
                        "{} {} {}\r\n",
                        "?".green().bold(),
                        self.message.bold(),
                        summary.cyan()
                    );
                    queue!(out, Print(line))?;
                    out.flush()?;
                    return Ok(Some(picked));
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let len = self.choices.len();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyOutcome::Cancel
            }
            KeyCode::Esc => KeyOutcome::Cancel,
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = (self.cursor + len - 1) % len;
                KeyOutcome::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1) % len;
                KeyOutcome::Continue
            }
            KeyCode::Char(' ') if self.multi => {
                self.checked[self.cursor] = !self.checked[self.cursor];
                KeyOutcome::Continue
            }
            KeyCode::Char('a') if self.multi => {
                let all = self.checked.iter().all(|c| *c);
                self.checked.iter_mut().for_each(|c| *c = !all);
                KeyOutcome::Continue
            }
            KeyCode::Enter => KeyOutcome::Submit,
            _ => KeyOutcome::Continue,
        }
    }

    fn picked(&self) -> Vec<usize> {
        if self.multi {
            (0..self.choices.len()).filter(|&i| self.checked[i]).collect()
        } else {
            vec![self.cursor]
        }
    }

    fn clear(&mut self, out: &mut impl Write) -> Result<()> {
        if self.drawn_rows > 0 {
            queue!(out, MoveUp(self.drawn_rows))?;
        }
        queue!(out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
        self.drawn_rows = 0;
        out.flush()?;
        Ok(())
    }

    fn draw(&mut self, out: &mut impl Write) -> Result<()> {
        self.clear(out)?;

        let hint = if self.multi {
            "(↑/↓ move, space toggle, a all, enter confirm)"
        } else {
            "(↑/↓ move, enter select)"
        };
        let header = format!(
            "{} {} {}\r\n",
            "?".green().bold(),
            self.message.bold(),
            hint.dimmed()
        );
        queue!(out, Print(header))?;
        let mut rows = 1u16;

        let len = self.choices.len();
        let start = window_start(len, self.cursor, MAX_VISIBLE_ROWS);
        let end = (start + MAX_VISIBLE_ROWS).min(len);

        for i in start..end {
            let pointer = if i == self.cursor { "❯" } else { " " };
            let mark = match (self.multi, self.checked[i]) {
                (true, true) => "◉ ",
                (true, false) => "◯ ",
                (false, _) => "",
            };
            let label = &self.choices[i].label;
            let line = if i == self.cursor {
                format!("{} {}{}", pointer.cyan(), mark, label.cyan())
            } else {
                format!("{} {}{}", pointer, mark, label)
            };
            queue!(out, Print(line), Print("\r\n"))?;
            rows += 1;
        }

        if len > MAX_VISIBLE_ROWS {
            let position = format!("  ({}/{})", self.cursor + 1, len);
            queue!(out, Print(format!("{}\r\n", position.dimmed())))?;
            rows += 1;
        }

        self.drawn_rows = rows;
        out.flush()?;
        Ok(())
    }
}

enum KeyOutcome {
    Continue,
    Cancel,
    Submit,
}
