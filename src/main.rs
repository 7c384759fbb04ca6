use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{LevelFilter, error, info};
use simplelog::{
    CombinedLogger, Config as LogConfig, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

use repotidy::commands;
use repotidy::config::{Config, Credential};
use repotidy::error::Result;
use repotidy::format::SortKey;
use repotidy::github::{GitHubClient, RepoClient};
use repotidy::operations::ListFilter;
use repotidy::prompt::TerminalPrompter;

#[derive(Parser)]
#[command(name = "repotidy")]
#[command(about = "Bulk visibility changes and deletion for your GitHub repositories")]
#[command(version)]
#[command(after_help = concat!("version ", env!("CARGO_PKG_VERSION")))]
struct Cli {
    /// Print debug logs to console
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu,

    /// Print your repositories as a table and exit
    List {
        /// Sort order
        #[arg(long, value_enum, default_value_t = SortKey::Updated)]
        sort: SortKey,
        /// Only private repositories
        #[arg(long, conflicts_with = "public")]
        private: bool,
        /// Only public repositories
        #[arg(long)]
        public: bool,
        /// Only names containing this text
        #[arg(long)]
        filter: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config, cli.debug);

    if let Err(e) = run(cli, config).await {
        error!("{}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    // Terminal logger: only with --debug
    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Debug,
            LogConfig::default(),
            TerminalMode::Stderr,
            simplelog::ColorChoice::Auto,
        ));
    }

    // File logger: always on, so failed batches can be diagnosed afterwards
    let log_path = config.logs_dir.join("repotidy.log");
    if let Ok(()) = std::fs::create_dir_all(&config.logs_dir)
        && let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(&log_path)
    {
        loggers.push(WriteLogger::new(LevelFilter::Debug, LogConfig::default(), file));
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let credential = Credential::from_env(&config)?;
    let client = GitHubClient::new(&config, &credential)?;
    let identity = client.authenticate().await?;
    println!("Signed in as {}\n", identity.login.bold());

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            info!("command: menu");
            let mut prompter = TerminalPrompter::new();
            commands::run_menu(&client, &mut prompter, &config).await?;
        }
        Commands::List {
            sort,
            private,
            public,
            filter,
        } => {
            info!(
                "command: list (sort={:?}, private={}, public={}, filter={:?})",
                sort, private, public, filter
            );
            let filter = ListFilter {
                sort,
                private: match (private, public) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                name: filter,
            };
            commands::handle_list(&client, &filter, &config).await?;
        }
    }

    Ok(())
}
