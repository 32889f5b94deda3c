//! Bulk snapshot import from directory CSV exports.
//!
//! Exports are flat: one row per organization, pipe-delimited multi-value
//! cells. The importer only builds snapshots; scoring them stays with the
//! orchestrator.

mod mapping;
mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use crate::scoring::domain::OrganizationProfile;

#[derive(Debug)]
pub enum SnapshotImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingSlug { row: usize },
}

impl std::fmt::Display for SnapshotImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotImportError::Io(err) => write!(f, "failed to read directory export: {}", err),
            SnapshotImportError::Csv(err) => write!(f, "invalid directory CSV data: {}", err),
            SnapshotImportError::MissingSlug { row } => {
                write!(f, "export row {} has no slug", row)
            }
        }
    }
}

impl std::error::Error for SnapshotImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotImportError::Io(err) => Some(err),
            SnapshotImportError::Csv(err) => Some(err),
            SnapshotImportError::MissingSlug { .. } => None,
        }
    }
}

impl From<std::io::Error> for SnapshotImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SnapshotImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct SnapshotImporter;

impl SnapshotImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<OrganizationProfile>, SnapshotImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<OrganizationProfile>, SnapshotImportError> {
        let rows = parser::parse_rows(reader)?;
        let mut profiles = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            // Data rows are 1-based in operator-facing messages.
            let slug = row
                .slug
                .as_deref()
                .ok_or(SnapshotImportError::MissingSlug { row: index + 1 })?;
            profiles.push(mapping::profile_from_row(row, slug));
        }

        Ok(profiles)
    }
}
