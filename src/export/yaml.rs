//! YAML export
//!
//! Human-readable export of the same bundle the JSON exporter produces.

use std::io::Write;

use crate::error::{HearthError, HearthResult};
use crate::models::User;
use crate::storage::Storage;

use super::json::FullExport;

/// Export the family's data to YAML
pub fn export_full_yaml<W: Write>(
    storage: &Storage,
    user: &User,
    writer: &mut W,
) -> HearthResult<()> {
    let export = FullExport::from_storage(storage, user)?;

    writeln!(writer, "# Hearth data export")
        .map_err(|e| HearthError::Export(e.to_string()))?;
    writeln!(writer, "# Family: {}", export.family.name)
        .map_err(|e| HearthError::Export(e.to_string()))?;
    writeln!(writer, "# Exported: {}", export.exported_at.to_rfc3339())
        .map_err(|e| HearthError::Export(e.to_string()))?;
    writeln!(writer, "# Schema: {}", export.schema_version)
        .map_err(|e| HearthError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| HearthError::Export(e.to_string()))?;

    Ok(())
}

/// Import from a YAML export (for verification/restore)
pub fn import_from_yaml(yaml_str: &str) -> HearthResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| HearthError::Import(e.to_string()))?;

    export.validate().map_err(HearthError::Import)?;

    Ok(export)
}
