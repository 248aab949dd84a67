//! CSV import CLI command
//!
//! Reads a bank CSV export, maps its columns (auto-detected from headers by
//! default), previews the rows, and commits them into one account. Duplicate
//! rows already imported are skipped by their dedup hash.

use std::path::PathBuf;

use clap::Args;

use crate::config::settings::Settings;
use crate::error::{HearthError, HearthResult};
use crate::models::User;
use crate::services::{AccountService, CategoryService, ColumnMapping, ImportService, RowStatus};
use crate::storage::Storage;

/// Arguments for `hearth import`
#[derive(Args)]
pub struct ImportArgs {
    /// Path to the CSV file
    pub file: PathBuf,
    /// Account name or ID to import into (default: the configured
    /// default_account)
    #[arg(short, long)]
    pub account: Option<String>,
    /// Category name or ID applied to every imported row
    #[arg(short, long)]
    pub category: Option<String>,
    /// Date format of the file, e.g. "%m/%d/%Y" (default: auto)
    #[arg(long)]
    pub date_format: Option<String>,
    /// Flip amount signs (for exports that show purchases as positive)
    #[arg(long)]
    pub invert: bool,
    /// Show what would be imported without writing anything
    #[arg(long)]
    pub preview: bool,
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    user: &User,
    settings: &Settings,
    args: ImportArgs,
) -> HearthResult<()> {
    let service = ImportService::new(storage, user);
    let accounts = AccountService::new(storage, user);
    let categories = CategoryService::new(storage, user);

    let account_ref = args
        .account
        .as_deref()
        .or(settings.default_account.as_deref())
        .ok_or_else(|| {
            HearthError::Import(
                "No account given; pass --account or set default_account in the config file"
                    .to_string(),
            )
        })?;
    let account = accounts.find(account_ref)?;
    let default_category = match &args.category {
        Some(c) => Some(categories.find(c)?.id),
        None => None,
    };

    let mut reader = csv::Reader::from_path(&args.file).map_err(|e| {
        HearthError::Import(format!("Cannot read {}: {}", args.file.display(), e))
    })?;

    let headers = reader
        .headers()
        .map_err(|e| HearthError::Import(format!("Cannot read CSV headers: {}", e)))?
        .clone();
    let mut mapping = ColumnMapping::detect(&headers);
    if let Some(format) = args.date_format {
        mapping.date_format = format;
    }
    mapping.invert_amounts = args.invert;

    let parsed = service.parse(&mut reader, &mapping)?;
    let preview = service.preview(&parsed)?;

    let new = preview
        .iter()
        .filter(|r| r.status == RowStatus::New)
        .count();
    let duplicates = preview
        .iter()
        .filter(|r| r.status == RowStatus::Duplicate)
        .count();
    let errors = preview
        .iter()
        .filter(|r| matches!(r.status, RowStatus::Error(_)))
        .count();

    println!(
        "{}: {} rows ({} new, {} duplicate, {} error)",
        args.file.display(),
        preview.len(),
        new,
        duplicates,
        errors
    );

    if args.preview {
        for row in &preview {
            match (&row.status, &row.row) {
                (RowStatus::New, Some(parsed)) => {
                    println!(
                        "  row {:>4}  new        {} {} {}",
                        row.row_number + 1,
                        parsed.date,
                        parsed.amount,
                        parsed.payee
                    );
                }
                (RowStatus::Duplicate, Some(parsed)) => {
                    println!(
                        "  row {:>4}  duplicate  {} {} {}",
                        row.row_number + 1,
                        parsed.date,
                        parsed.amount,
                        parsed.payee
                    );
                }
                (RowStatus::Error(message), _) => {
                    println!("  row {:>4}  error      {}", row.row_number + 1, message);
                }
                _ => {}
            }
        }
        println!();
        println!("Preview only; nothing was imported.");
        return Ok(());
    }

    let outcome = service.commit(&preview, account.id, default_category)?;

    println!(
        "Imported {} transactions into {} ({} duplicates skipped, {} errors)",
        outcome.imported, account.name, outcome.duplicates_skipped, outcome.errors
    );
    if !outcome.error_messages.is_empty() {
        let mut rows: Vec<_> = outcome.error_messages.iter().collect();
        rows.sort_by_key(|(row_number, _)| **row_number);
        for (row_number, message) in rows {
            println!("  row {}: {}", row_number + 1, message);
        }
    }

    Ok(())
}
