//! Command argument structs.
//!
//! Each CLI command has its own argument struct using clap's derive API.
//! Validation happens at parse time via `value_parser` so bad input fails
//! before any storage is touched.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::validators::{
    validate_documentation, validate_name, validate_query, validate_record_id, validate_version_id,
};

/// Arguments for the init command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Reinitialize even if a repository already exists (saved queries are kept)
    #[arg(long)]
    pub force: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the create command
#[derive(Parser, Debug, Clone)]
pub struct CreateArgs {
    /// Display name for the query record
    #[arg(long, value_parser = validate_name)]
    pub name: String,

    /// The query body to save
    #[arg(long, value_parser = validate_query)]
    pub query: String,

    /// Free-text documentation for the query
    #[arg(long, value_parser = validate_documentation)]
    pub docs: Option<String>,

    /// Comma-separated tags (e.g. auth,detection)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
}

/// Arguments for the list command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Show only favorite records
    #[arg(long)]
    pub favorites: bool,

    /// List favorites ahead of the rest (creation order within each group)
    #[arg(long)]
    pub favorites_first: bool,

    /// Show only records carrying this exact tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Maximum number of records to show
    #[arg(short = 'n', long, default_value_t = 50)]
    pub limit: usize,
}

/// Arguments for the search command
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Term to match against name, query body, documentation, and tags
    pub term: String,

    /// Show only favorite records
    #[arg(long)]
    pub favorites: bool,

    /// List favorites ahead of the rest (creation order within each group)
    #[arg(long)]
    pub favorites_first: bool,

    /// Show only records carrying this exact tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Maximum number of records to show
    #[arg(short = 'n', long, default_value_t = 50)]
    pub limit: usize,
}

/// Arguments for the show command
#[derive(Parser, Debug, Clone)]
#[command(disable_version_flag = true)]
pub struct ShowArgs {
    /// Record id(s) to show
    #[arg(required = true, value_parser = validate_record_id)]
    pub record_ids: Vec<String>,

    /// Show the snapshot of one historical version instead of the live record
    #[arg(long, value_parser = validate_version_id)]
    pub version: Option<String>,
}

/// Arguments for the update command
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Record id to update
    #[arg(value_parser = validate_record_id)]
    pub record_id: String,

    /// New display name
    #[arg(long, value_parser = validate_name)]
    pub name: Option<String>,

    /// New query body
    #[arg(long, value_parser = validate_query)]
    pub query: Option<String>,

    /// New documentation text
    #[arg(long, value_parser = validate_documentation, conflicts_with = "clear_docs")]
    pub docs: Option<String>,

    /// Remove the documentation entirely
    #[arg(long)]
    pub clear_docs: bool,

    /// Replacement comma-separated tag set
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
}

/// Arguments for the revert command
#[derive(Parser, Debug, Clone)]
pub struct RevertArgs {
    /// Record id to revert
    #[arg(value_parser = validate_record_id)]
    pub record_id: String,

    /// Version id to restore the content of
    #[arg(value_parser = validate_version_id)]
    pub version_id: String,
}

/// Arguments for the history command
#[derive(Parser, Debug, Clone)]
pub struct HistoryArgs {
    /// Record id whose version history to show
    #[arg(value_parser = validate_record_id)]
    pub record_id: String,
}

/// Arguments for the favorite command
#[derive(Parser, Debug, Clone)]
pub struct FavoriteArgs {
    /// Record id(s) whose favorite flag to toggle
    #[arg(required = true, value_parser = validate_record_id)]
    pub record_ids: Vec<String>,
}

/// Arguments for the tag command
#[derive(Parser, Debug, Clone)]
pub struct TagArgs {
    /// Tag operation to perform
    #[command(subcommand)]
    pub action: TagAction,
}

/// Tag subcommand actions
#[derive(Subcommand, Debug, Clone)]
pub enum TagAction {
    /// Add tags to a record (does not create a new version)
    Add {
        /// Record id to tag
        #[arg(value_parser = validate_record_id)]
        record_id: String,

        /// Comma-separated tags to add (e.g. auth,detection)
        tags: String,
    },
    /// Remove one tag from a record (does not create a new version)
    Remove {
        /// Record id to untag
        #[arg(value_parser = validate_record_id)]
        record_id: String,

        /// Exact tag to remove
        tag: String,
    },
}

/// Arguments for the delete command
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Record id(s) to delete
    #[arg(required = true, value_parser = validate_record_id)]
    pub record_ids: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the export command
#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// File to write the export to (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the import command
#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    /// JSON file containing an array of records to import
    pub input: PathBuf,
}
