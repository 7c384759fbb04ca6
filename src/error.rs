use thiserror::Error;

const TOKEN_HELP: &str = r#"

Create a personal access token with the `repo` and `delete_repo` scopes at
https://github.com/settings/tokens and export it before starting:

  $ export GITHUB_TOKEN=ghp_xxxxxxxxxxxxxxxxxxxx
"#;

#[derive(Error, Debug)]
pub enum RepotidyError {
    #[error("Environment variable '{0}' is not set{TOKEN_HELP}")]
    MissingCredential(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to fetch repositories: {0}")]
    Fetch(String),

    #[error("Failed to update '{repo}': {message}")]
    Mutation { repo: String, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RepotidyError>;

impl RepotidyError {
    /// Errors that must stop the process instead of returning to the menu
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RepotidyError::MissingCredential(_)
                | RepotidyError::Auth(_)
                | RepotidyError::Config(_)
                | RepotidyError::Prompt(_)
        )
    }

    pub fn mutation(repo: &str, message: impl Into<String>) -> Self {
        RepotidyError::Mutation {
            repo: repo.to_string(),
            message: message.into(),
        }
    }
}
