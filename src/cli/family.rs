//! Family CLI commands

use clap::Subcommand;

use crate::error::HearthResult;
use crate::models::User;
use crate::services::FamilyService;
use crate::storage::Storage;

/// Family subcommands
#[derive(Subcommand)]
pub enum FamilyCommands {
    /// Show the family and its members
    Show,
    /// Rename the family
    Rename {
        /// New family name
        name: String,
    },
    /// Show the invite code, or replace it
    Invite {
        /// Generate a new invite code, invalidating the old one
        #[arg(long)]
        regenerate: bool,
    },
}

/// Handle a family command
pub fn handle_family_command(
    storage: &Storage,
    user: &User,
    cmd: FamilyCommands,
) -> HearthResult<()> {
    let service = FamilyService::new(storage, user);

    match cmd {
        FamilyCommands::Show => {
            let details = service.show()?;
            println!("Family: {}", details.family.name);
            println!("  Invite code: {}", details.family.invite_code);
            println!(
                "  Created:     {}",
                details.family.created_at.format("%Y-%m-%d")
            );
            println!();
            println!("Members:");
            for member in &details.members {
                let marker = if member.id == user.id { " (you)" } else { "" };
                println!("  {} <{}>{}", member.name, member.email, marker);
            }
        }

        FamilyCommands::Rename { name } => {
            let family = service.rename(&name)?;
            println!("Renamed family to: {}", family.name);
        }

        FamilyCommands::Invite { regenerate } => {
            if regenerate {
                let family = service.regenerate_invite()?;
                println!("New invite code: {}", family.invite_code);
                println!("The previous code no longer works.");
            } else {
                let details = service.show()?;
                println!("Invite code: {}", details.family.invite_code);
            }
        }
    }

    Ok(())
}
