//! Command execution logic.
//!
//! Functions in this module take parsed arguments plus an [`App`] context,
//! run the storage operation, persist the result, and print it in the
//! requested output mode. Parsing stays in `args`/`validators`; printing
//! stays in `output`; this module wires the two together.

use anyhow::Result;

use super::args::{
    CreateArgs, DeleteArgs, ExportArgs, FavoriteArgs, HistoryArgs, ImportArgs, InitArgs, ListArgs,
    RevertArgs, SearchArgs, ShowArgs, TagAction, TagArgs, UpdateArgs,
};
use super::types::{BatchError, BatchResult};
use crate::app::App;
use crate::commands::{import, init};
use crate::domain::{
    NewQueryRecord, QueryFilter, QueryRecord, QueryRecordUpdate, RecordId, VersionId,
};
use crate::error::Error;
use crate::output::{self, OutputMode};

/// Execute the init command.
///
/// Creates the `.quiver` directory structure in the current working
/// directory. With `--force`, an existing repository is reinitialized
/// (config rewritten, data file preserved).
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let result = init::init(&current_dir, args.force).await?;

    if !args.quiet {
        if result.reinitialized {
            println!(
                "Reinitialized existing quiver repository in {}",
                result.quiver_dir.display()
            );
        } else {
            println!(
                "Initialized quiver repository in {}",
                result.quiver_dir.display()
            );
        }
        println!("  Config:  {}", result.config_file.display());
        println!("  Queries: {}", result.queries_file.display());
    }

    Ok(())
}

/// Execute the info command.
///
/// Prints where the repository stores its data and summary counts over
/// the record collection.
pub async fn execute_info(app: &App, output_mode: OutputMode) -> Result<()> {
    use std::collections::BTreeSet;

    let data_file = app.quiver_dir().join(init::QUERIES_FILE_NAME);

    let records = app.storage().search(&QueryFilter::default()).await?;
    let total = records.len();
    let favorites = records.iter().filter(|r| r.is_favorite).count();
    let versions: usize = records.iter().map(|r| r.versions.len()).sum();
    let tags: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.tags.iter().map(String::as_str))
        .collect();

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "dataFile": data_file.display().to_string(),
                "records": total,
                "favorites": favorites,
                "versions": versions,
                "tags": tags.len(),
            }))?;
        }
        OutputMode::Text => {
            println!("Quiver repository");
            println!("=================");
            println!();
            println!("Data file: {}", data_file.display());
            println!();
            println!("Records:   {total}");
            println!("Favorites: {favorites}");
            println!("Versions:  {versions}");
            println!("Tags:      {}", tags.len());
        }
    }

    Ok(())
}

/// Execute the create command.
pub async fn execute_create(
    app: &mut App,
    args: &CreateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let new_record = NewQueryRecord {
        name: args.name.clone(),
        query: args.query.clone(),
        documentation: args.docs.clone(),
        tags: args.tags.clone(),
    };

    let record = app.storage_mut().create(new_record).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&record)?,
        OutputMode::Text => {
            let version = record.current_entry().map_or(1, |entry| entry.version);
            println!("Created record {} (v{})", record.id, version);
        }
    }

    Ok(())
}

/// Execute the list command.
pub async fn execute_list(app: &App, args: &ListArgs, output_mode: OutputMode) -> Result<()> {
    let filter = QueryFilter {
        term: None,
        favorites_only: args.favorites,
        favorites_first: args.favorites_first,
        tag: args.tag.clone(),
        limit: Some(args.limit),
    };

    let records = app.storage().search(&filter).await?;
    output::print_records(&records, output_mode)?;

    Ok(())
}

/// Execute the search command.
///
/// Same as list but with a required match term against name, query text,
/// documentation, and tags.
pub async fn execute_search(app: &App, args: &SearchArgs, output_mode: OutputMode) -> Result<()> {
    let filter = QueryFilter {
        term: Some(args.term.clone()),
        favorites_only: args.favorites,
        favorites_first: args.favorites_first,
        tag: args.tag.clone(),
        limit: Some(args.limit),
    };

    let records = app.storage().search(&filter).await?;
    output::print_records(&records, output_mode)?;

    Ok(())
}

/// Execute the show command.
///
/// Accepts multiple ids. All ids are resolved before anything is printed,
/// so a missing record fails the whole command rather than producing
/// partial output. With `--version`, a single record's historical snapshot
/// is shown instead of the live record.
pub async fn execute_show(app: &App, args: &ShowArgs, output_mode: OutputMode) -> Result<()> {
    if let Some(version_str) = &args.version {
        if args.record_ids.len() != 1 {
            anyhow::bail!("--version applies to a single record id");
        }
        let record_id = parse_record_id(&args.record_ids[0])?;
        let version_id = parse_version_id(version_str)?;
        let record = app
            .storage()
            .get(&record_id)
            .await?
            .ok_or(Error::RecordNotFound(record_id))?;
        let entry = record
            .find_version(&version_id)
            .ok_or(Error::VersionNotFound {
                record: record_id,
                version: version_id,
            })?;

        output::print_version_details(&record, entry, output_mode)?;
        return Ok(());
    }

    let mut records = Vec::with_capacity(args.record_ids.len());

    for id_str in &args.record_ids {
        let record_id = parse_record_id(id_str)?;
        let record = app
            .storage()
            .get(&record_id)
            .await?
            .ok_or(Error::RecordNotFound(record_id))?;
        records.push(record);
    }

    match output_mode {
        // Always an array, even for a single id, so scripted callers get a
        // stable shape.
        OutputMode::Json => output::print_json(&records)?,
        OutputMode::Text => {
            for (i, record) in records.iter().enumerate() {
                if i > 0 {
                    println!();
                    println!("---");
                    println!();
                }
                output::print_record_details(record, output_mode)?;
            }
        }
    }

    Ok(())
}

/// Execute the update command.
///
/// A new version is recorded only when the resolved content differs from
/// the current version's snapshot; submitting identical content leaves
/// the history alone.
pub async fn execute_update(
    app: &mut App,
    args: &UpdateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let record_id = parse_record_id(&args.record_id)?;

    let update = QueryRecordUpdate {
        name: args.name.clone(),
        query: args.query.clone(),
        documentation: documentation_update(args.docs.as_ref(), args.clear_docs),
        tags: args.tags.clone(),
    };

    if update.is_empty() {
        anyhow::bail!(
            "Nothing to update. Provide at least one of --name, --query, --docs, --clear-docs, or --tags."
        );
    }

    let before = app
        .storage()
        .get(&record_id)
        .await?
        .ok_or(Error::RecordNotFound(record_id))?;
    let versions_before = before.versions.len();

    let record = app.storage_mut().update(&record_id, update).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&record)?,
        OutputMode::Text => {
            let version = record.current_entry().map_or(0, |entry| entry.version);
            if record.versions.len() > versions_before {
                println!("Updated record {} (now v{})", record.id, version);
            } else {
                println!(
                    "Updated record {} (no content change, still v{})",
                    record.id, version
                );
            }
        }
    }

    Ok(())
}

/// Execute the revert command.
pub async fn execute_revert(
    app: &mut App,
    args: &RevertArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let record_id = parse_record_id(&args.record_id)?;
    let version_id = parse_version_id(&args.version_id)?;

    let record = app.storage_mut().revert(&record_id, &version_id).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&record)?,
        OutputMode::Text => {
            let version = record.current_entry().map_or(0, |entry| entry.version);
            println!(
                "Reverted record {} to version {} (now v{})",
                record.id, version_id, version
            );
        }
    }

    Ok(())
}

/// Execute the history command.
pub async fn execute_history(app: &App, args: &HistoryArgs, output_mode: OutputMode) -> Result<()> {
    let record_id = parse_record_id(&args.record_id)?;
    let record = app
        .storage()
        .get(&record_id)
        .await?
        .ok_or(Error::RecordNotFound(record_id))?;

    output::print_history(&record, output_mode)?;

    Ok(())
}

/// Execute the favorite command.
///
/// # Batch Processing
///
/// Each record id is processed independently with save-after-each-success
/// semantics:
/// - Each successful toggle is immediately saved to disk
/// - Processing continues even if some toggles fail
/// - The structured result shows both succeeded and failed operations
/// - The exit code is non-zero if any failures occurred
pub async fn execute_favorite(
    app: &mut App,
    args: &FavoriteArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let mut result = BatchResult::new();

    for id_str in &args.record_ids {
        let storage_result = match parse_record_id(id_str) {
            Ok(record_id) => app.storage_mut().toggle_favorite(&record_id).await,
            Err(e) => Err(Error::Validation(e.to_string())),
        };
        save_or_record_failure(app, &mut result, id_str, storage_result).await;
    }

    output_batch_result(&result, "Toggled favorite on", output_mode)?;

    if result.has_failures() {
        anyhow::bail!(
            "{} of {} toggle(s) failed",
            result.failed.len(),
            result.total()
        );
    }

    Ok(())
}

/// Execute the tag command.
pub async fn execute_tag(app: &mut App, args: &TagArgs, output_mode: OutputMode) -> Result<()> {
    let record = match &args.action {
        TagAction::Add { record_id, tags } => {
            let id = parse_record_id(record_id)?;
            app.storage_mut().add_tags(&id, tags).await?
        }
        TagAction::Remove { record_id, tag } => {
            let id = parse_record_id(record_id)?;
            app.storage_mut().remove_tag(&id, tag).await?
        }
    };
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&record)?,
        OutputMode::Text => {
            if record.tags.is_empty() {
                println!("Record {} has no tags", record.id);
            } else {
                println!("Tags for {}: {}", record.id, record.tags.join(", "));
            }
        }
    }

    Ok(())
}

/// Execute the delete command.
///
/// # Batch Processing
///
/// Every id is resolved up front; ids that do not exist are recorded as
/// failures and excluded from the confirmation prompt. The remaining
/// records are deleted with save-after-each-success semantics, and the
/// exit code is non-zero if any id failed.
pub async fn execute_delete(
    app: &mut App,
    args: &DeleteArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let mut result = BatchResult::new();
    let mut targets: Vec<(String, QueryRecord)> = Vec::new();

    for id_str in &args.record_ids {
        match parse_record_id(id_str) {
            Ok(record_id) => match app.storage().get(&record_id).await {
                Ok(Some(record)) => targets.push((id_str.clone(), record)),
                Ok(None) => result.failed.push(BatchError {
                    record_id: id_str.clone(),
                    error: Error::RecordNotFound(record_id).to_string(),
                }),
                Err(e) => result.failed.push(BatchError {
                    record_id: id_str.clone(),
                    error: e.to_string(),
                }),
            },
            Err(e) => result.failed.push(BatchError {
                record_id: id_str.clone(),
                error: e.to_string(),
            }),
        }
    }

    // Confirm before deleting unless --force was given
    if !args.force && !targets.is_empty() {
        let summary: Vec<String> = targets
            .iter()
            .map(|(_, record)| format!("{} ({})", record.id, record.name))
            .collect();
        eprint!(
            "Delete {} record(s): {}? [y/N]: ",
            targets.len(),
            summary.join(", ")
        );
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let response = input.trim().to_lowercase();
        if response != "y" && response != "yes" {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    for (id_str, record) in targets {
        let storage_result = app.storage_mut().delete(&record.id).await.map(|()| record);
        save_or_record_failure(app, &mut result, &id_str, storage_result).await;
    }

    output_batch_result(&result, "Deleted", output_mode)?;

    if result.has_failures() {
        anyhow::bail!(
            "{} of {} delete(s) failed",
            result.failed.len(),
            result.total()
        );
    }

    Ok(())
}

/// Execute the export command.
///
/// With `--output`, the collection is written to the given file using the
/// same atomic write as the data file itself. Without it, the JSON array
/// goes to stdout in both output modes, since the export format is JSON.
pub async fn execute_export(app: &App, args: &ExportArgs, output_mode: OutputMode) -> Result<()> {
    let records = app.storage().export_all().await?;

    match &args.output {
        Some(path) => {
            quiver_archive::write_array_atomic(path, &records)
                .await
                .map_err(Error::from)?;

            match output_mode {
                OutputMode::Json => {
                    output::print_json(&serde_json::json!({
                        "exported": records.len(),
                        "path": path.display().to_string(),
                    }))?;
                }
                OutputMode::Text => {
                    println!("Exported {} record(s) to {}", records.len(), path.display());
                }
            }
        }
        None => output::print_json(&records)?,
    }

    Ok(())
}

/// Execute the import command.
///
/// The payload is parsed and validated in full before anything is added,
/// so a malformed file leaves the collection exactly as it was.
pub async fn execute_import(
    app: &mut App,
    args: &ImportArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.input)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", args.input.display(), e))?;

    let records = import::parse_import_payload(&text).map_err(Error::from)?;
    let imported = app.storage_mut().import_records(records).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "imported": imported,
                "source": args.input.display().to_string(),
            }))?;
        }
        OutputMode::Text => {
            println!(
                "Imported {} record(s) from {}",
                imported,
                args.input.display()
            );
        }
    }

    Ok(())
}

/// Parse a record id the CLI validators already vetted.
fn parse_record_id(s: &str) -> Result<RecordId> {
    s.trim()
        .parse::<RecordId>()
        .map_err(|_| anyhow::anyhow!("Invalid record id: {s}"))
}

/// Parse a version id the CLI validators already vetted.
fn parse_version_id(s: &str) -> Result<VersionId> {
    s.trim()
        .parse::<VersionId>()
        .map_err(|_| anyhow::anyhow!("Invalid version id: {s}"))
}

/// Map the `--docs` / `--clear-docs` flags onto the doubly-optional
/// documentation update. clap rejects passing both at once.
fn documentation_update(docs: Option<&String>, clear: bool) -> Option<Option<String>> {
    match (docs, clear) {
        (Some(text), _) => Some(Some(text.clone())),
        (None, true) => Some(None),
        (None, false) => None,
    }
}

/// Record the outcome of one batch element, saving on success.
///
/// A successful storage operation is saved to disk immediately. If the
/// save fails, storage is reloaded from disk so memory and file agree
/// again, and the element is recorded as failed.
async fn save_or_record_failure(
    app: &mut App,
    result: &mut BatchResult,
    record_id: &str,
    storage_result: crate::error::Result<QueryRecord>,
) {
    match storage_result {
        Ok(record) => {
            if let Err(save_err) = app.save().await {
                if let Err(reload_err) = app.reload().await {
                    eprintln!("Warning: failed to reload storage after save error: {reload_err}");
                }
                result.failed.push(BatchError {
                    record_id: record_id.to_string(),
                    error: format!("Save failed: {save_err}"),
                });
            } else {
                result.succeeded.push(record);
            }
        }
        Err(e) => {
            result.failed.push(BatchError {
                record_id: record_id.to_string(),
                error: e.to_string(),
            });
        }
    }
}

/// Print a batch result in the requested output mode.
fn output_batch_result(result: &BatchResult, action: &str, output_mode: OutputMode) -> Result<()> {
    match output_mode {
        OutputMode::Json => output::print_json(result)?,
        OutputMode::Text => {
            if !result.succeeded.is_empty() {
                let ids: Vec<String> = result
                    .succeeded
                    .iter()
                    .map(|record| record.id.to_string())
                    .collect();
                println!(
                    "{} {} record(s): {}",
                    action,
                    result.succeeded.len(),
                    ids.join(", ")
                );
            }
            if !result.failed.is_empty() {
                eprintln!("Failed {} record(s):", result.failed.len());
                for err in &result.failed {
                    eprintln!("  {}: {}", err.record_id, err.error);
                }
            }
        }
    }

    Ok(())
}
