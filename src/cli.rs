//! CLI argument parsing, validation, and startup helpers.

use crate::db::{Database, NewUser};
use crate::password::hash_password;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the password for `--create-user`.
pub const USER_PASSWORD_ENV: &str = "HALLPASS_USER_PASSWORD";

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hallpass",
    about = "School data server with bearer token authentication"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "HALLPASS_PORT", default_value = "8082")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, env = "HALLPASS_DATABASE", default_value = "hallpass.db")]
    pub database: String,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Create a user with this email on startup. The password is read from HALLPASS_USER_PASSWORD
    #[arg(long, requires_all = ["first_name", "last_name"])]
    pub create_user: Option<String>,

    /// First name for --create-user
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name for --create-user
    #[arg(long)]
    pub last_name: Option<String>,

    /// User type for --create-user
    #[arg(long, default_value = "1")]
    pub user_type: i64,
}

/// Initialize logging based on the specified format.
/// Filtering follows RUST_LOG, defaulting to `info`.
pub fn init_logging(format: &LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

/// Load the new user's password from the environment.
/// Returns None and logs an error if it is missing or too short.
pub fn load_user_password() -> Option<String> {
    let Ok(password) = std::env::var(USER_PASSWORD_ENV) else {
        error!("{} must be set when using --create-user", USER_PASSWORD_ENV);
        return None;
    };
    // Clear the environment variable to prevent leaking
    // SAFETY: We're single-threaded at this point during startup,
    // and no other code is reading this environment variable.
    unsafe { std::env::remove_var(USER_PASSWORD_ENV) };

    if password.len() < MIN_PASSWORD_LENGTH {
        error!(
            "Password is shorter than {} characters. Use a longer password",
            MIN_PASSWORD_LENGTH
        );
        return None;
    }

    Some(password)
}

/// Handle the --create-user flag. Returns false if the user could not be created.
pub async fn handle_create_user(db: &Database, args: &Args, email: &str) -> bool {
    let Some(password) = load_user_password() else {
        return false;
    };

    let hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return false;
        }
    };

    let user = NewUser {
        user_type: args.user_type,
        first_name: args.first_name.as_deref().unwrap_or_default(),
        last_name: args.last_name.as_deref().unwrap_or_default(),
        email,
        password_hash: &hash,
    };

    match db.users().create(&user).await {
        Ok(id) => {
            info!(user_id = id, email = %email, "User created");
            true
        }
        Err(e) => {
            error!(email = %email, error = %e, "Failed to create user");
            false
        }
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
