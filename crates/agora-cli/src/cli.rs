use agora_common::Presence;
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Agora presence client.
#[derive(Parser, Debug)]
#[command(name = "agora", version, about)]
pub struct Args {
    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in, follow users and print their presence as it changes.
    ///
    /// Every line typed on stdin counts as activity. Ctrl-C logs out.
    Watch {
        #[command(flatten)]
        login: Login,

        /// Users to follow, e.g. `@bob:example.org`.
        #[arg(required = true)]
        users: Vec<String>,

        /// Status message to publish with the local presence.
        #[arg(long)]
        status_msg: Option<String>,
    },

    /// Look up one user's presence.
    Get {
        #[command(flatten)]
        login: Login,

        user: String,
    },

    /// Set the local user's presence once.
    Set {
        #[command(flatten)]
        login: Login,

        /// online, unavailable or offline.
        presence: Presence,

        #[arg(long)]
        status_msg: Option<String>,
    },

    /// Store the server URL and mark onboarding as done.
    Onboard {
        #[arg(long)]
        server: String,
    },

    /// Print the effective configuration as JSON.
    Config,
}

/// Credentials shared by the commands that talk to the server.
#[derive(ClapArgs, Debug)]
pub struct Login {
    /// Fully qualified user id of the local user.
    #[arg(long)]
    pub user_id: String,

    /// Access token for the local user.
    #[arg(long, env = "AGORA_ACCESS_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Server URL; defaults to the configured one.
    #[arg(long)]
    pub server: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
