//! On-disk board format and schema checks

use super::model::Board;
use crate::error::{ModerationError, Result};
use crate::types::ProtocolVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Schema version written by this build
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// Versioned wrapper around a [`Board`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardFile {
    pub schema_version: String,
    pub board: Board,
    /// Unknown top-level keys written by newer minor versions
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl BoardFile {
    pub fn new(board: Board) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            board,
            extra: HashMap::new(),
        }
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn version(&self) -> Option<ProtocolVersion> {
        ProtocolVersion::parse(&self.schema_version)
    }
}

/// Brings older board files up to [`CURRENT_SCHEMA_VERSION`]
pub struct BoardMigrator;

impl BoardMigrator {
    /// Accept any 1.x file and restamp it with the current version.
    ///
    /// Files with a different major version are rejected.
    pub fn migrate(mut file: BoardFile) -> Result<BoardFile> {
        let version = file
            .version()
            .ok_or_else(|| ModerationError::UnsupportedSchemaVersion(file.schema_version.clone()))?;

        if !version.is_compatible(&ProtocolVersion::V1_0) {
            return Err(ModerationError::UnsupportedSchemaVersion(
                file.schema_version.clone(),
            ));
        }

        if Self::needs_migration(&file) {
            tracing::debug!(
                "Migrating board from schema {} to {}",
                file.schema_version,
                CURRENT_SCHEMA_VERSION
            );
            file.schema_version = CURRENT_SCHEMA_VERSION.to_string();
        }

        Ok(file)
    }

    pub fn needs_migration(file: &BoardFile) -> bool {
        file.schema_version != CURRENT_SCHEMA_VERSION
    }
}
