/// CLI argument parsing

use clap::{Parser, Subcommand};

// Build timestamp injected at compile time
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const VERSION_WITH_BUILD: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built: ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(name = "spr-status")]
#[command(author, version = VERSION_WITH_BUILD, about = "Terminal status dashboard for the SPR admin API", long_about = None)]
pub struct Cli {
    /// Base URL of the SPR API (overrides SPR_API_URL and the config file)
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a one-shot status snapshot
    Status,

    /// Show volume mounts for a container
    Mounts {
        /// Container name
        container: String,
    },

    /// Print the admin UI logs route for a container
    Logs {
        /// Container name
        container: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_invocation() {
        let cli = Cli::parse_from(["spr-status"]);
        assert!(cli.command.is_none());
        assert!(cli.url.is_none());
    }

    #[test]
    fn test_parse_url_flag_with_subcommand() {
        let cli = Cli::parse_from(["spr-status", "--url", "http://192.168.2.1:8000", "status"]);
        assert_eq!(cli.url.as_deref(), Some("http://192.168.2.1:8000"));
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn test_parse_mounts_container() {
        let cli = Cli::parse_from(["spr-status", "mounts", "superdns"]);
        match cli.command {
            Some(Commands::Mounts { container }) => assert_eq!(container, "superdns"),
            _ => panic!("expected mounts subcommand"),
        }
    }
}
