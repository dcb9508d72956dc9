//! Command-line interface for quiver.
//!
//! # Commands
//!
//! - `init` - Initialize a repository in the current directory
//! - `info` - Show repository location and record counts
//! - `create` - Create a query record
//! - `list` - List records
//! - `search` - Search records by term
//! - `show` - Show full record details
//! - `update` - Update a record (new version on content change)
//! - `revert` - Restore an earlier version's content
//! - `history` - Show a record's version history
//! - `favorite` - Toggle the favorite flag
//! - `tag` - Add or remove tags
//! - `delete` - Delete records
//! - `export` - Export all records as a JSON array
//! - `import` - Import records from a JSON array file
//!
//! # Global Flags
//!
//! - `--json` - Output results as JSON instead of text
//!
//! # Example
//!
//! ```bash
//! quiver init
//! quiver create --name "Failed logons" --query "SecurityEvent | where EventID == 4625"
//! quiver list --favorites-first
//! quiver search logon --json
//! ```

mod args;
mod execute;
mod types;
mod validators;

pub use args::{
    CreateArgs, DeleteArgs, ExportArgs, FavoriteArgs, HistoryArgs, ImportArgs, InitArgs, ListArgs,
    RevertArgs, SearchArgs, ShowArgs, TagAction, TagArgs, UpdateArgs,
};
pub use types::{BatchError, BatchResult};
pub use validators::{
    validate_documentation, validate_name, validate_query, validate_record_id, validate_version_id,
};

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Versioned storage for saved KQL queries
#[derive(Parser, Debug)]
#[command(name = "quiver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a quiver repository in the current directory
    Init(InitArgs),

    /// Show repository location and record counts
    Info,

    /// Create a new query record
    Create(CreateArgs),

    /// List records
    List(ListArgs),

    /// Search records by name, query text, documentation, and tags
    Search(SearchArgs),

    /// Show full details for one or more records
    Show(ShowArgs),

    /// Update a record, recording a new version when the content changes
    Update(UpdateArgs),

    /// Restore the content of an earlier version as a new version
    Revert(RevertArgs),

    /// Show a record's version history
    History(HistoryArgs),

    /// Toggle the favorite flag on one or more records
    Favorite(FavoriteArgs),

    /// Add or remove record tags
    Tag(TagArgs),

    /// Delete one or more records
    Delete(DeleteArgs),

    /// Export every record as a JSON array
    Export(ExportArgs),

    /// Import records from a JSON array file
    Import(ImportArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns a `clap::Error` when the arguments do not parse.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns an error when the command fails. Every command except
    /// `init` requires an initialized repository in the current directory
    /// or one of its parents.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(args).await,
            Some(Commands::Info) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_info(&app, output_mode).await
            }
            Some(Commands::Create(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_create(&mut app, args, output_mode).await
            }
            Some(Commands::List(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_list(&app, args, output_mode).await
            }
            Some(Commands::Search(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_search(&app, args, output_mode).await
            }
            Some(Commands::Show(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_show(&app, args, output_mode).await
            }
            Some(Commands::Update(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_update(&mut app, args, output_mode).await
            }
            Some(Commands::Revert(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_revert(&mut app, args, output_mode).await
            }
            Some(Commands::History(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_history(&app, args, output_mode).await
            }
            Some(Commands::Favorite(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_favorite(&mut app, args, output_mode).await
            }
            Some(Commands::Tag(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_tag(&mut app, args, output_mode).await
            }
            Some(Commands::Delete(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_delete(&mut app, args, output_mode).await
            }
            Some(Commands::Export(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_export(&app, args, output_mode).await
            }
            Some(Commands::Import(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_import(&mut app, args, output_mode).await
            }
            None => {
                println!("quiver - versioned storage for saved KQL queries");
                println!("Use 'quiver --help' to see available commands");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== top level ==========

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["quiver"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_global_json_flag() {
        let cli = Cli::try_parse_from(["quiver", "list", "--json"]).unwrap();
        assert!(cli.json);

        // Also accepted before the subcommand
        let cli = Cli::try_parse_from(["quiver", "--json", "list"]).unwrap();
        assert!(cli.json);
    }

    // ========== init ==========

    #[test]
    fn test_parse_init_defaults() {
        let cli = Cli::try_parse_from(["quiver", "init"]).unwrap();
        match cli.command {
            Some(Commands::Init(args)) => {
                assert!(!args.force);
                assert!(!args.quiet);
            }
            _ => panic!("expected init command"),
        }
    }

    #[test]
    fn test_parse_init_force_quiet() {
        let cli = Cli::try_parse_from(["quiver", "init", "--force", "-q"]).unwrap();
        match cli.command {
            Some(Commands::Init(args)) => {
                assert!(args.force);
                assert!(args.quiet);
            }
            _ => panic!("expected init command"),
        }
    }

    // ========== create ==========

    #[test]
    fn test_parse_create_full() {
        let cli = Cli::try_parse_from([
            "quiver",
            "create",
            "--name",
            "Failed logons",
            "--query",
            "SecurityEvent | where EventID == 4625",
            "--docs",
            "Spike detection",
            "--tags",
            "auth,detection",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Create(args)) => {
                assert_eq!(args.name, "Failed logons");
                assert!(args.query.contains("4625"));
                assert_eq!(args.docs.as_deref(), Some("Spike detection"));
                assert_eq!(args.tags, vec!["auth", "detection"]);
            }
            _ => panic!("expected create command"),
        }
    }

    #[test]
    fn test_parse_create_requires_name_and_query() {
        assert!(Cli::try_parse_from(["quiver", "create", "--name", "x"]).is_err());
        assert!(Cli::try_parse_from(["quiver", "create", "--query", "x"]).is_err());
    }

    #[test]
    fn test_parse_create_rejects_blank_name() {
        let result =
            Cli::try_parse_from(["quiver", "create", "--name", "   ", "--query", "Heartbeat"]);
        assert!(result.is_err());
    }

    // ========== list / search ==========

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["quiver", "list"]).unwrap();
        match cli.command {
            Some(Commands::List(args)) => {
                assert!(!args.favorites);
                assert!(!args.favorites_first);
                assert!(args.tag.is_none());
                assert_eq!(args.limit, 50);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_parse_list_with_filters() {
        let cli =
            Cli::try_parse_from(["quiver", "list", "--favorites", "--tag", "auth", "-n", "10"])
                .unwrap();
        match cli.command {
            Some(Commands::List(args)) => {
                assert!(args.favorites);
                assert_eq!(args.tag.as_deref(), Some("auth"));
                assert_eq!(args.limit, 10);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_parse_list_favorites_first() {
        let cli = Cli::try_parse_from(["quiver", "list", "--favorites-first"]).unwrap();
        match cli.command {
            Some(Commands::List(args)) => assert!(args.favorites_first),
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_parse_search_term() {
        let cli = Cli::try_parse_from(["quiver", "search", "logon"]).unwrap();
        match cli.command {
            Some(Commands::Search(args)) => {
                assert_eq!(args.term, "logon");
                assert_eq!(args.limit, 50);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_parse_search_requires_term() {
        assert!(Cli::try_parse_from(["quiver", "search"]).is_err());
    }

    // ========== show ==========

    #[test]
    fn test_parse_show_single_id() {
        let cli = Cli::try_parse_from(["quiver", "show", "1700000000123"]).unwrap();
        match cli.command {
            Some(Commands::Show(args)) => {
                assert_eq!(args.record_ids, vec!["1700000000123"]);
            }
            _ => panic!("expected show command"),
        }
    }

    #[test]
    fn test_parse_show_multiple_ids() {
        let cli =
            Cli::try_parse_from(["quiver", "show", "1700000000123", "1700000000124"]).unwrap();
        match cli.command {
            Some(Commands::Show(args)) => {
                assert_eq!(args.record_ids.len(), 2);
            }
            _ => panic!("expected show command"),
        }
    }

    #[test]
    fn test_parse_show_with_version() {
        let cli = Cli::try_parse_from([
            "quiver",
            "show",
            "1700000000123",
            "--version",
            "1700000000999",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Show(args)) => {
                assert_eq!(args.record_ids, vec!["1700000000123"]);
                assert_eq!(args.version.as_deref(), Some("1700000000999"));
            }
            _ => panic!("expected show command"),
        }
    }

    #[test]
    fn test_parse_show_version_rejects_non_numeric() {
        let result =
            Cli::try_parse_from(["quiver", "show", "1700000000123", "--version", "latest"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_show_requires_id() {
        assert!(Cli::try_parse_from(["quiver", "show"]).is_err());
    }

    #[test]
    fn test_parse_show_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["quiver", "show", "abc"]).is_err());
    }

    #[test]
    fn test_parse_show_rejects_zero_id() {
        assert!(Cli::try_parse_from(["quiver", "show", "0"]).is_err());
    }

    // ========== update ==========

    #[test]
    fn test_parse_update_fields() {
        let cli = Cli::try_parse_from([
            "quiver",
            "update",
            "1700000000123",
            "--name",
            "Renamed",
            "--query",
            "Heartbeat | count",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Update(args)) => {
                assert_eq!(args.record_id, "1700000000123");
                assert_eq!(args.name.as_deref(), Some("Renamed"));
                assert_eq!(args.query.as_deref(), Some("Heartbeat | count"));
                assert!(args.docs.is_none());
                assert!(!args.clear_docs);
                assert!(args.tags.is_none());
            }
            _ => panic!("expected update command"),
        }
    }

    #[test]
    fn test_parse_update_tags_delimiter() {
        let cli = Cli::try_parse_from([
            "quiver",
            "update",
            "1700000000123",
            "--tags",
            "detection,windows",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Update(args)) => {
                assert_eq!(args.tags.unwrap(), vec!["detection", "windows"]);
            }
            _ => panic!("expected update command"),
        }
    }

    #[test]
    fn test_parse_update_clear_docs() {
        let cli =
            Cli::try_parse_from(["quiver", "update", "1700000000123", "--clear-docs"]).unwrap();
        match cli.command {
            Some(Commands::Update(args)) => {
                assert!(args.clear_docs);
                assert!(args.docs.is_none());
            }
            _ => panic!("expected update command"),
        }
    }

    #[test]
    fn test_parse_update_docs_conflicts_with_clear() {
        let result = Cli::try_parse_from([
            "quiver",
            "update",
            "1700000000123",
            "--docs",
            "text",
            "--clear-docs",
        ]);
        assert!(result.is_err());
    }

    // ========== revert / history ==========

    #[test]
    fn test_parse_revert() {
        let cli =
            Cli::try_parse_from(["quiver", "revert", "1700000000123", "1700000000999"]).unwrap();
        match cli.command {
            Some(Commands::Revert(args)) => {
                assert_eq!(args.record_id, "1700000000123");
                assert_eq!(args.version_id, "1700000000999");
            }
            _ => panic!("expected revert command"),
        }
    }

    #[test]
    fn test_parse_revert_requires_both_ids() {
        assert!(Cli::try_parse_from(["quiver", "revert", "1700000000123"]).is_err());
    }

    #[test]
    fn test_parse_history() {
        let cli = Cli::try_parse_from(["quiver", "history", "1700000000123"]).unwrap();
        match cli.command {
            Some(Commands::History(args)) => {
                assert_eq!(args.record_id, "1700000000123");
            }
            _ => panic!("expected history command"),
        }
    }

    // ========== favorite / tag / delete ==========

    #[test]
    fn test_parse_favorite_multiple_ids() {
        let cli =
            Cli::try_parse_from(["quiver", "favorite", "1700000000123", "1700000000124"]).unwrap();
        match cli.command {
            Some(Commands::Favorite(args)) => {
                assert_eq!(args.record_ids.len(), 2);
            }
            _ => panic!("expected favorite command"),
        }
    }

    #[test]
    fn test_parse_tag_add() {
        let cli =
            Cli::try_parse_from(["quiver", "tag", "add", "1700000000123", "auth,detection"])
                .unwrap();
        match cli.command {
            Some(Commands::Tag(args)) => match args.action {
                TagAction::Add { record_id, tags } => {
                    assert_eq!(record_id, "1700000000123");
                    assert_eq!(tags, "auth,detection");
                }
                TagAction::Remove { .. } => panic!("expected add action"),
            },
            _ => panic!("expected tag command"),
        }
    }

    #[test]
    fn test_parse_tag_remove() {
        let cli = Cli::try_parse_from(["quiver", "tag", "remove", "1700000000123", "auth"]).unwrap();
        match cli.command {
            Some(Commands::Tag(args)) => match args.action {
                TagAction::Remove { record_id, tag } => {
                    assert_eq!(record_id, "1700000000123");
                    assert_eq!(tag, "auth");
                }
                TagAction::Add { .. } => panic!("expected remove action"),
            },
            _ => panic!("expected tag command"),
        }
    }

    #[test]
    fn test_parse_tag_requires_action() {
        assert!(Cli::try_parse_from(["quiver", "tag"]).is_err());
    }

    #[test]
    fn test_parse_delete_force() {
        let cli = Cli::try_parse_from(["quiver", "delete", "1700000000123", "--force"]).unwrap();
        match cli.command {
            Some(Commands::Delete(args)) => {
                assert_eq!(args.record_ids, vec!["1700000000123"]);
                assert!(args.force);
            }
            _ => panic!("expected delete command"),
        }
    }

    // ========== export / import ==========

    #[test]
    fn test_parse_export_to_file() {
        let cli = Cli::try_parse_from(["quiver", "export", "-o", "backup.json"]).unwrap();
        match cli.command {
            Some(Commands::Export(args)) => {
                assert_eq!(args.output.unwrap().to_str(), Some("backup.json"));
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn test_parse_export_default_stdout() {
        let cli = Cli::try_parse_from(["quiver", "export"]).unwrap();
        match cli.command {
            Some(Commands::Export(args)) => assert!(args.output.is_none()),
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from(["quiver", "import", "backup.json"]).unwrap();
        match cli.command {
            Some(Commands::Import(args)) => {
                assert_eq!(args.input.to_str(), Some("backup.json"));
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn test_parse_import_requires_path() {
        assert!(Cli::try_parse_from(["quiver", "import"]).is_err());
    }
}
