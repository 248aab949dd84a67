//! Authentication CLI commands
//!
//! Register, login, logout, whoami, and password changes. These are the only
//! commands that run without a session.

use clap::Subcommand;

use crate::error::{HearthError, HearthResult};
use crate::services::{AuthService, RegisterTarget};
use crate::storage::Storage;

/// Authentication subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Register a new user, creating a family or joining one by invite code
    Register {
        /// Your display name
        name: String,
        /// Email address
        email: String,
        /// Create a new family with this name
        #[arg(long, conflicts_with = "invite")]
        family: Option<String>,
        /// Join an existing family with this invite code
        #[arg(long)]
        invite: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Log in
    Login {
        /// Email address
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Log out, removing the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Change your password
    Passwd,
}

/// Handle an auth command
pub fn handle_auth_command(storage: &Storage, cmd: AuthCommands) -> HearthResult<()> {
    let service = AuthService::new(storage);

    match cmd {
        AuthCommands::Register {
            name,
            email,
            family,
            invite,
            password,
        } => {
            let target = match (family, invite) {
                (Some(family_name), None) => RegisterTarget::NewFamily { family_name },
                (None, Some(invite_code)) => RegisterTarget::JoinFamily { invite_code },
                _ => {
                    return Err(HearthError::Validation(
                        "Pass exactly one of --family <name> or --invite <code>".into(),
                    ))
                }
            };

            let password = resolve_password(password, true)?;
            let (user, family) = service.register(&name, &email, &password, target)?;

            println!("Welcome, {}!", user.name);
            println!("  Family:      {}", family.name);
            println!("  Invite code: {}", family.invite_code);
            println!();
            println!("You are now logged in. Others can join your family with:");
            println!("  hearth auth register <name> <email> --invite {}", family.invite_code);
        }

        AuthCommands::Login { email, password } => {
            let password = resolve_password(password, false)?;
            let user = service.login(&email, &password)?;
            println!("Logged in as {} ({})", user.name, user.email);
        }

        AuthCommands::Logout => {
            service.logout()?;
            println!("Logged out.");
        }

        AuthCommands::Whoami => match service.current_user()? {
            Some(user) => {
                println!("{} ({})", user.name, user.email);
                if let Some(family) = storage.families.get(user.family_id)? {
                    println!("Family: {}", family.name);
                }
            }
            None => println!("Not logged in."),
        },

        AuthCommands::Passwd => {
            let user = service
                .current_user()?
                .ok_or_else(|| HearthError::Auth("Not logged in".into()))?;

            let current = prompt_password("Current password: ")?;
            let new = prompt_password("New password: ")?;
            let confirm = prompt_password("Confirm new password: ")?;
            if new != confirm {
                return Err(HearthError::Validation("Passwords do not match".into()));
            }

            service.change_password(&user, &current, &new)?;
            println!("Password changed.");
        }
    }

    Ok(())
}

fn resolve_password(password: Option<String>, confirm: bool) -> HearthResult<String> {
    match password {
        Some(p) => Ok(p),
        None => {
            let p = prompt_password("Password: ")?;
            if confirm {
                let again = prompt_password("Confirm password: ")?;
                if p != again {
                    return Err(HearthError::Validation("Passwords do not match".into()));
                }
            }
            Ok(p)
        }
    }
}

fn prompt_password(prompt: &str) -> HearthResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|e| HearthError::Io(format!("Failed to read password: {}", e)))
}
