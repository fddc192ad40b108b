//! Argument parsing.

use clap::{Parser, Subcommand};

/// Per-project development log.
///
/// With no command, reads one hook payload from stdin and records it.
#[derive(Debug, Parser)]
#[command(name = "devlog", version, about = "Per-project development event log")]
pub struct Cli {
    /// Command to run (default: `hook`).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// The command surface.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List every project with an event log.
    #[command(visible_alias = "ls")]
    Projects,
    /// Show recent slices, files, commands and an event summary.
    #[command(visible_alias = "st")]
    Status {
        /// Project (default: the current directory's project).
        project: Option<String>,
    },
    /// Show the events of one slice, or of the newest one.
    Slice {
        /// Project (default: the current directory's project).
        project: Option<String>,
        /// Slice ID (default: newest slice).
        slice_id: Option<String>,
    },
    /// Show activity across projects.
    Recent {
        /// Trailing window in days.
        #[arg(default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,
    },
    /// Queue a work item.
    Queue {
        /// What needs doing.
        description: String,
        /// Extra context.
        #[arg(long)]
        context: Option<String>,
    },
    /// Record a blocked work item.
    Block {
        /// What is blocked.
        description: String,
        /// Why it is blocked.
        #[arg(long, default_value = "unspecified")]
        reason: String,
    },
    /// Complete the newest work item whose ID starts with a prefix.
    Complete {
        /// Work item ID prefix.
        prefix: String,
    },
    /// List work items.
    #[command(visible_alias = "list")]
    Work {
        /// Include completed items.
        #[arg(short, long)]
        all: bool,
    },
    /// Store a handoff for the next session from a JSON object.
    Handoff {
        /// JSON object, e.g. `{"goal":"...","done":[...]}`.
        json: String,
    },
    /// Print resumable context for a starting session (reads a JSON payload on stdin).
    Context,
    /// Record one hook payload read from stdin.
    Hook,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("devlog").chain(args.iter().copied()))
    }

    #[test]
    fn no_command_means_hook() {
        assert!(parse(&[]).unwrap().command.is_none());
    }

    #[test]
    fn aliases() {
        assert_eq!(parse(&["ls"]).unwrap().command, Some(Command::Projects));
        assert_eq!(
            parse(&["st", "alpha"]).unwrap().command,
            Some(Command::Status {
                project: Some("alpha".into())
            })
        );
        assert_eq!(
            parse(&["list", "-a"]).unwrap().command,
            Some(Command::Work { all: true })
        );
    }

    #[test]
    fn block_reason_defaults() {
        assert_eq!(
            parse(&["block", "deploy"]).unwrap().command,
            Some(Command::Block {
                description: "deploy".into(),
                reason: "unspecified".into()
            })
        );
    }

    #[test]
    fn recent_days_default_and_bounds() {
        assert_eq!(parse(&["recent"]).unwrap().command, Some(Command::Recent { days: 7 }));
        assert_eq!(parse(&["recent", "3"]).unwrap().command, Some(Command::Recent { days: 3 }));
        assert!(parse(&["recent", "0"]).is_err());
    }

    #[test]
    fn missing_arguments_are_usage_errors() {
        let err = parse(&["queue"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
        assert!(parse(&["complete"]).is_err());
        assert!(parse(&["frobnicate"]).is_err());
    }
}
