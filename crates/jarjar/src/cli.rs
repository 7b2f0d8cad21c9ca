use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::client::Method;

/// Jarjar – post messages to a Slack incoming webhook
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Activate verbose output (-v, -vv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Config profile whose defaults apply on top of the top-level ones
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Per-call overrides shared by `send` and `run`.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Message text
    #[arg(short, long)]
    pub message: Option<String>,

    /// Channel to post to (e.g. #general)
    #[arg(short = 'C', long)]
    pub channel: Option<String>,

    /// Webhook URL
    #[arg(short, long, env = "SLACK_WEBHOOK_URL")]
    pub webhook: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Post a message and/or attachment
    Send {
        #[command(flatten)]
        target: Target,

        /// Attachment as a JSON object of title/value pairs
        #[arg(short, long, value_name = "JSON")]
        attach: Option<String>,

        /// Entry method to send through
        #[arg(long, value_enum, default_value_t = Method::Text)]
        method: Method,
    },
    /// Run a command, then post how it went
    Run {
        #[command(flatten)]
        target: Target,

        /// Program and arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Print build information
    Version {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_send_flags() {
        let cli = Cli::try_parse_from([
            "jarjar", "-vv", "send", "-m", "hi", "-C", "#ops", "-a", r#"{"a":1}"#, "--method",
            "attach",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Send {
                target,
                attach,
                method,
            } => {
                assert_eq!(target.message.as_deref(), Some("hi"));
                assert_eq!(target.channel.as_deref(), Some("#ops"));
                assert_eq!(attach.as_deref(), Some(r#"{"a":1}"#));
                assert_eq!(method, Method::Attach);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn run_keeps_program_flags() {
        let cli =
            Cli::try_parse_from(["jarjar", "run", "-m", "built", "--", "make", "-j4"]).unwrap();
        match cli.command {
            Commands::Run { target, command } => {
                assert_eq!(target.message.as_deref(), Some("built"));
                assert_eq!(command, ["make", "-j4"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
