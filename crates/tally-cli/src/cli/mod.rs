use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `tly` binary.
#[derive(Debug, Parser)]
#[command(name = "tly", version, about = "Tally - personal task tracker with cloud sync")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Work on local data only; skip remote sync for this run
    #[arg(long, global = true)]
    pub offline: bool,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            offline: self.offline,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::{AuthCommands, TaskCommands, TrashCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["tly", "--format", "json", "--limit", "5", "--offline", "sync"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.limit, Some(5));
        assert!(cli.offline);
        assert!(matches!(cli.command, Commands::Sync));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["tly", "trash", "list", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Trash {
                action: TrashCommands::List { .. }
            }
        ));
    }

    #[test]
    fn task_add_collects_fields() {
        let cli = Cli::try_parse_from([
            "tly",
            "task",
            "add",
            "--title",
            "Book dentist",
            "--priority",
            "critical",
            "--deadline",
            "2024-07-01",
            "--progress",
            "25%",
        ])
        .expect("cli should parse");

        let Commands::Task {
            action: TaskCommands::Add(args),
        } = cli.command
        else {
            panic!("expected task add");
        };
        assert_eq!(args.title, "Book dentist");
        assert_eq!(args.fields.priority.as_deref(), Some("critical"));
        assert_eq!(args.fields.deadline.as_deref(), Some("2024-07-01"));
        assert_eq!(args.fields.progress.as_deref(), Some("25%"));
        assert!(args.created.is_none());
    }

    #[test]
    fn task_add_requires_title() {
        assert!(Cli::try_parse_from(["tly", "task", "add", "--notes", "x"]).is_err());
    }

    #[test]
    fn task_update_takes_positional_id() {
        let cli = Cli::try_parse_from(["tly", "task", "update", "000004", "--status", "done"])
            .expect("cli should parse");
        let Commands::Task {
            action: TaskCommands::Update { id, title, fields },
        } = cli.command
        else {
            panic!("expected task update");
        };
        assert_eq!(id, "000004");
        assert!(title.is_none());
        assert_eq!(fields.status.as_deref(), Some("done"));
    }

    #[test]
    fn auth_login_parses_expiry() {
        let cli = Cli::try_parse_from(["tly", "auth", "login", "--token", "ya29.x", "--expires-in", "3600"])
            .expect("cli should parse");
        let Commands::Auth {
            action: AuthCommands::Login(args),
        } = cli.command
        else {
            panic!("expected auth login");
        };
        assert_eq!(args.token, "ya29.x");
        assert_eq!(args.expires_in, Some(3600));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["tly", "--format", "xml", "sync"]).is_err());
    }

    #[test]
    fn mutating_commands_are_classified() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).expect("cli should parse").command;
        assert!(parse(&["tly", "task", "done", "000001"]).is_mutating());
        assert!(parse(&["tly", "trash", "clear"]).is_mutating());
        assert!(parse(&["tly", "sync"]).is_mutating());
        assert!(!parse(&["tly", "task", "list"]).is_mutating());
        assert!(!parse(&["tly", "stats"]).is_mutating());
    }
}
