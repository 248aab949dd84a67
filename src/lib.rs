//! Hearth - family personal finance from the command line
//!
//! Hearth tracks a household's accounts, transactions, budgets, and
//! recurring bills in plain JSON files, shared between family members
//! through a common data directory. Every member logs in with their own
//! credentials; every change is attributed in an append-only audit log.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (families, users, accounts, transactions,
//!   categories, budgets, schedules)
//! - `storage`: JSON file storage layer
//! - `auth`: Password hashing and the on-disk session
//! - `services`: Business logic layer, family-scoped
//! - `audit`: Audit logging system
//! - `backup`: Backup and restore
//! - `import`/`export`: CSV import and CSV/JSON/YAML export
//! - `reports`: Spending and cashflow reports
//! - `display`: Terminal table rendering
//! - `cli`: Command definitions and handlers

pub mod audit;
pub mod auth;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{HearthError, HearthResult};
