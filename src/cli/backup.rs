//! Backup CLI commands
//!
//! Backups are single JSON archives of every data file. `restore` writes a
//! safety backup first so the pre-restore state can be recovered.

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::{HearthPaths, Settings};
use crate::error::{HearthError, HearthResult};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a backup now
    Create,
    /// List existing backups
    List {
        /// Show full paths and sizes
        #[arg(short, long)]
        verbose: bool,
    },
    /// Restore from a backup, replacing current data
    Restore {
        /// Backup filename, or "latest"
        backup: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Inspect a backup without restoring it
    Info {
        /// Backup filename, or "latest"
        backup: String,
    },
    /// Delete backups beyond the retention policy
    Prune {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &HearthPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> HearthResult<()> {
    let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => {
            let (backup_path, deleted) = manager.create_backup_with_retention()?;
            println!("Backup created: {}", backup_path.display());
            if !deleted.is_empty() {
                println!("Pruned {} old backup(s) per retention policy.", deleted.len());
            }
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;
            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: hearth backup create");
                return Ok(());
            }

            println!("Backups ({}):", backups.len());
            for info in &backups {
                let age = format_duration(Utc::now() - info.created_at);
                let tag = if info.is_monthly { " [monthly]" } else { "" };
                if verbose {
                    println!(
                        "  {}  {} ago  {}{}",
                        info.path.display(),
                        age,
                        format_size(info.size_bytes),
                        tag
                    );
                } else {
                    println!("  {}  ({} ago){}", info.filename, age, tag);
                }
            }
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;

            let restorer = RestoreManager::new(paths.clone());
            let validation = restorer.validate_backup(&backup_path)?;
            println!("Backup: {}", backup_path.display());
            println!("  {}", validation.summary());

            if !force {
                print!("Replace current data with this backup? [y/N] ");
                io::stdout()
                    .flush()
                    .map_err(|e| HearthError::Io(e.to_string()))?;
                let mut answer = String::new();
                io::stdin()
                    .read_line(&mut answer)
                    .map_err(|e| HearthError::Io(e.to_string()))?;
                if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                    println!("Restore cancelled.");
                    return Ok(());
                }
            }

            let (safety_path, result) = restorer.restore_with_safety(&backup_path, &manager)?;
            println!("{}", result.summary());
            println!("Pre-restore state saved to: {}", safety_path.display());
        }

        BackupCommands::Info { backup } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;
            let info = manager
                .get_backup(
                    backup_path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or_default(),
                )?
                .ok_or_else(|| {
                    HearthError::Backup(format!("Backup not found: {}", backup_path.display()))
                })?;

            let restorer = RestoreManager::new(paths.clone());
            let validation = restorer.validate_backup(&backup_path)?;

            println!("Backup: {}", info.filename);
            println!("  Path:    {}", info.path.display());
            println!("  Created: {}", info.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("  Size:    {}", format_size(info.size_bytes));
            println!("  Kind:    {}", if info.is_monthly { "monthly" } else { "daily" });
            println!("  {}", validation.summary());
        }

        BackupCommands::Prune { force } => {
            if !force {
                let retention = &settings.backup_retention;
                print!(
                    "Keep the {} newest daily and {} newest monthly backups, delete the rest? [y/N] ",
                    retention.daily_count, retention.monthly_count
                );
                io::stdout()
                    .flush()
                    .map_err(|e| HearthError::Io(e.to_string()))?;
                let mut answer = String::new();
                io::stdin()
                    .read_line(&mut answer)
                    .map_err(|e| HearthError::Io(e.to_string()))?;
                if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                    println!("Prune cancelled.");
                    return Ok(());
                }
            }

            let deleted = manager.enforce_retention()?;
            if deleted.is_empty() {
                println!("Nothing to prune.");
            } else {
                println!("Deleted {} backup(s):", deleted.len());
                for path in &deleted {
                    println!("  {}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// Resolve a backup argument to a path; "latest" picks the newest backup
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> HearthResult<PathBuf> {
    if backup == "latest" {
        return manager
            .get_latest_backup()?
            .map(|info| info.path)
            .ok_or_else(|| HearthError::Backup("No backups found".into()));
    }

    let info = manager
        .get_backup(backup)?
        .ok_or_else(|| HearthError::Backup(format!("Backup not found: {}", backup)))?;
    Ok(info.path)
}

/// Render a duration as the largest round unit ("3d", "5h", "12m", "30s")
fn format_duration(duration: chrono::Duration) -> String {
    if duration.num_days() > 0 {
        format!("{}d", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m", duration.num_minutes())
    } else {
        format!("{}s", duration.num_seconds().max(0))
    }
}

/// Render a byte count with a binary unit
fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}
