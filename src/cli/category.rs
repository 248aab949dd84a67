//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_list;
use crate::error::{HearthError, HearthResult};
use crate::models::{CategoryKind, User};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Add a new category
    Add {
        /// Category name
        name: String,
        /// Kind (expense or income)
        #[arg(short, long, default_value = "expense")]
        kind: String,
    },
    /// List categories
    List {
        /// Include archived categories
        #[arg(short, long)]
        all: bool,
        /// Only show this kind (expense or income)
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Rename a category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },
    /// Archive a category
    Archive {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    user: &User,
    cmd: CategoryCommands,
) -> HearthResult<()> {
    let service = CategoryService::new(storage, user);

    match cmd {
        CategoryCommands::Add { name, kind } => {
            let kind: CategoryKind = kind.parse().map_err(HearthError::Validation)?;
            let category = service.create(&name, kind)?;
            println!("Created category: {}", category);
        }

        CategoryCommands::List { all, kind } => {
            let mut categories = service.list(all)?;
            if let Some(kind) = kind {
                let kind: CategoryKind = kind.parse().map_err(HearthError::Validation)?;
                categories.retain(|c| c.kind == kind);
            }
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Rename { category, name } => {
            let found = service.find(&category)?;
            let renamed = service.rename(found.id, &name)?;
            println!("Renamed category to: {}", renamed.name);
        }

        CategoryCommands::Archive { category } => {
            let found = service.find(&category)?;
            let archived = service.archive(found.id)?;
            println!("Archived category: {}", archived.name);
        }
    }

    Ok(())
}
