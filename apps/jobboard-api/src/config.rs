//! Command-line and environment configuration

use clap::Parser;

/// Default number of listings on the home-page panel
pub const DEFAULT_LATEST_LIMIT: u32 = 6;

/// Command-line arguments for the listing service
#[derive(Parser, Debug, Clone)]
#[command(name = "jobboard-api")]
#[command(about = "Listing service for the restaurant job board")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3001")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// SQLite connection string; defaults to a file in the platform data directory
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Key moderators send in `X-Admin-Key` to approve listings.
    /// Approval is disabled when unset.
    #[arg(long, env = "ADMIN_KEY", hide_env_values = true)]
    pub admin_key: Option<String>,

    /// Number of listings returned by `/api/jobs/latest`
    #[arg(long, default_value_t = DEFAULT_LATEST_LIMIT)]
    pub latest_limit: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["jobboard-api"]);
        assert_eq!(args.latest_limit, DEFAULT_LATEST_LIMIT);
        assert!(!args.verbose);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "jobboard-api",
            "--port",
            "8080",
            "--admin-key",
            "secret",
            "--latest-limit",
            "3",
            "-v",
        ]);
        assert_eq!(args.port, 8080);
        assert_eq!(args.admin_key.as_deref(), Some("secret"));
        assert_eq!(args.latest_limit, 3);
        assert!(args.verbose);
    }
}
