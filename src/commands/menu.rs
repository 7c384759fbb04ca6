use colored::Colorize;
use log::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::github::RepoClient;
use crate::operations::ListFilter;
use crate::prompt::{Choice, Prompter};

use super::{handle_delete, handle_visibility, print_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ChangeVisibility,
    Delete,
    List,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::ChangeVisibility,
        MenuAction::Delete,
        MenuAction::List,
        MenuAction::Exit,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MenuAction::ChangeVisibility => "visibility",
            MenuAction::Delete => "delete",
            MenuAction::List => "list",
            MenuAction::Exit => "exit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::ChangeVisibility => "🔄 Change repository visibility",
            MenuAction::Delete => "🗑  Delete repositories",
            MenuAction::List => "📋 List repositories",
            MenuAction::Exit => "👋 Exit",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key)
    }

    fn choices() -> Vec<Choice> {
        Self::ALL.iter().map(|a| Choice::new(a.key(), a.label())).collect()
    }
}

/// Back-to-back failures of the menu prompt itself before giving up.
const MAX_MENU_PROMPT_FAILURES: u32 = 3;

/// Main menu loop. Recoverable errors are shown and the menu comes back;
/// only fatal ones end the loop.
pub async fn run_menu<C, P>(client: &C, prompter: &mut P, config: &Config) -> Result<()>
where
    C: RepoClient,
    P: Prompter + ?Sized,
{
    let mut prompt_failures = 0;
    loop {
        let choices = MenuAction::choices();
        let picked = match prompter.select_one("What would you like to do?", &choices) {
            Ok(picked) => picked,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                prompt_failures += 1;
                if prompt_failures >= MAX_MENU_PROMPT_FAILURES {
                    error!("menu: prompt failed {} times in a row: {}", prompt_failures, e);
                    return Err(e);
                }
                error!("menu: prompt failed: {}", e);
                println!("{} {}", "✗".red(), e);
                continue;
            }
        };
        prompt_failures = 0;

        let action = picked
            .as_deref()
            .and_then(MenuAction::parse)
            .unwrap_or(MenuAction::Exit);
        info!("menu: {:?}", action);

        let result = match action {
            MenuAction::ChangeVisibility => handle_visibility(client, prompter, config).await,
            MenuAction::Delete => handle_delete(client, prompter, config).await,
            MenuAction::List => {
                print_list(client, &ListFilter::default(), config).await;
                Ok(())
            }
            MenuAction::Exit => break,
        };

        if let Err(e) = result {
            if e.is_fatal() {
                return Err(e);
            }
            error!("menu: {:?} failed: {}", action, e);
            println!("{} {}", "✗".red(), e);
        }
        println!();
    }

    println!("Goodbye!");
    Ok(())
}
