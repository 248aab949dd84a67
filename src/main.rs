use anyhow::Result;
use clap::{Parser, Subcommand};

use hearth::audit::AuditActor;
use hearth::cli::{
    handle_account_command, handle_audit_command, handle_auth_command, handle_backup_command,
    handle_budget_command, handle_category_command, handle_export_command, handle_family_command,
    handle_import_command, handle_report_command, handle_scheduled_command,
    handle_transaction_command,
};
use hearth::config::{HearthPaths, Settings};
use hearth::error::HearthError;
use hearth::models::User;
use hearth::services::AuthService;
use hearth::storage::Storage;

#[derive(Parser)]
#[command(
    name = "hearth",
    version,
    about = "Family personal finance from the command line",
    long_about = "Hearth tracks a household's accounts, transactions, budgets, and \
                  recurring bills in plain JSON files. Family members share one data \
                  directory, log in with their own credentials, and every change is \
                  attributed in an audit log."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register, login, logout, whoami, passwd
    #[command(subcommand)]
    Auth(hearth::cli::AuthCommands),

    /// Family membership and invite codes
    #[command(subcommand)]
    Family(hearth::cli::FamilyCommands),

    /// Account management commands
    #[command(subcommand)]
    Account(hearth::cli::AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(hearth::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(hearth::cli::TransactionCommands),

    /// Scheduled and recurring transactions
    #[command(subcommand, alias = "sched")]
    Scheduled(hearth::cli::ScheduledCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(hearth::cli::BudgetCommands),

    /// Spending and cashflow reports
    #[command(subcommand)]
    Report(hearth::cli::ReportCommands),

    /// Import transactions from a CSV file
    Import(hearth::cli::ImportArgs),

    /// Export data as CSV, JSON, or YAML
    #[command(subcommand)]
    Export(hearth::cli::ExportCommands),

    /// Backup and restore
    #[command(subcommand)]
    Backup(hearth::cli::BackupCommands),

    /// Audit log
    #[command(subcommand)]
    Audit(hearth::cli::AuditCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = HearthPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Auth(cmd)) => {
            handle_auth_command(&storage, cmd)?;
        }
        Some(Commands::Family(cmd)) => {
            let user = require_login(&storage)?;
            handle_family_command(&storage, &user, cmd)?;
        }
        Some(Commands::Account(cmd)) => {
            let user = require_login(&storage)?;
            handle_account_command(&storage, &user, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            let user = require_login(&storage)?;
            handle_category_command(&storage, &user, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            let user = require_login(&storage)?;
            handle_transaction_command(&storage, &user, cmd)?;
        }
        Some(Commands::Scheduled(cmd)) => {
            let user = require_login(&storage)?;
            handle_scheduled_command(&storage, &user, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            let user = require_login(&storage)?;
            handle_budget_command(&storage, &user, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            let user = require_login(&storage)?;
            handle_report_command(&storage, &user, cmd)?;
        }
        Some(Commands::Import(args)) => {
            let user = require_login(&storage)?;
            handle_import_command(&storage, &user, &settings, args)?;
        }
        Some(Commands::Export(cmd)) => {
            let user = require_login(&storage)?;
            handle_export_command(&storage, &user, cmd)?;
        }
        Some(Commands::Backup(cmd)) => {
            let user = require_login(&storage)?;
            handle_backup_command(&paths, &settings, cmd)?;
        }
        Some(Commands::Audit(cmd)) => {
            require_login(&storage)?;
            handle_audit_command(&storage, cmd)?;
        }
        Some(Commands::Config) => {
            println!("Hearth Configuration");
            println!("====================");
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:      {}", settings.currency_symbol);
            println!("  Date format:          {}", settings.date_format);
            println!("  Upcoming window:      {} days", settings.upcoming_window_days);
            println!(
                "  Default account:      {}",
                settings.default_account.as_deref().unwrap_or("(none)")
            );
            println!(
                "  Backup retention:     {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
        }
        None => {
            println!("Hearth - family personal finance from the command line");
            println!();
            println!("Run 'hearth --help' for usage information.");
            println!("New here? Start with:");
            println!("  hearth auth register <name> <email> --family <family-name>");
        }
    }

    Ok(())
}

/// Resolve the logged-in user and attribute subsequent writes to them
fn require_login(storage: &Storage) -> Result<User, HearthError> {
    let user = AuthService::new(storage).current_user()?.ok_or_else(|| {
        HearthError::Auth("Not logged in. Run 'hearth auth login <email>' first".into())
    })?;

    storage.set_actor(Some(AuditActor {
        user_id: user.id.to_string(),
        email: user.email.clone(),
    }))?;

    Ok(user)
}
