//! Registry persisted as a JSON file.

use chrono::{SecondsFormat, Utc};
use docseal_canonical::{ContentIdentifier, MetadataIdentifier};
use docseal_core::{async_trait, RecordRef, Registry, RegistryError};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    next_id: u64,
    records: Vec<RegistryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryEntry {
    record_id: RecordRef,
    content_identifier: ContentIdentifier,
    metadata_identifier: MetadataIdentifier,
    registered_at: String,
}

/// File-backed registry. A missing file is an empty registry.
///
/// Records are kept in registration order, so reverse lookup by a shared
/// metadata identifier answers with the first record.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    /// Opens (without creating) the registry at `path`.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Result<RegistryFile, RegistryError> {
        if !self.path.exists() {
            return Ok(RegistryFile::default());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| self.unavailable(e))?;
        serde_json::from_str(&raw).map_err(|e| self.unavailable(e))
    }

    /// Writes a sibling temp file and renames it over the registry, so a
    /// crash mid-write leaves the previous contents intact.
    fn store(&self, file: &RegistryFile) -> Result<(), RegistryError> {
        let raw = serde_json::to_string_pretty(file).map_err(|e| self.unavailable(e))?;
        let tmp = self.temp_path();
        let write = || -> std::io::Result<()> {
            let mut out = File::create(&tmp)?;
            out.write_all(raw.as_bytes())?;
            out.sync_all()?;
            fs::rename(&tmp, &self.path)
        };
        write().map_err(|e| {
            let _ = fs::remove_file(&tmp);
            self.unavailable(e)
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn unavailable(&self, err: impl std::fmt::Display) -> RegistryError {
        RegistryError::Unavailable(format!("{}: {}", self.path.display(), err))
    }
}

#[async_trait]
impl Registry for FileRegistry {
    async fn lookup_by_content_id(
        &self,
        id: &ContentIdentifier,
    ) -> Result<Option<RecordRef>, RegistryError> {
        Ok(self
            .load()?
            .records
            .into_iter()
            .find(|r| &r.content_identifier == id)
            .map(|r| r.record_id))
    }

    async fn lookup_by_metadata_id(
        &self,
        id: &MetadataIdentifier,
    ) -> Result<Option<RecordRef>, RegistryError> {
        Ok(self
            .load()?
            .records
            .into_iter()
            .find(|r| &r.metadata_identifier == id)
            .map(|r| r.record_id))
    }

    async fn register(
        &self,
        content: &ContentIdentifier,
        metadata: &MetadataIdentifier,
    ) -> Result<RecordRef, RegistryError> {
        let mut file = self.load()?;
        if let Some(existing) = file
            .records
            .iter()
            .find(|r| &r.content_identifier == content)
        {
            if &existing.metadata_identifier == metadata {
                return Ok(existing.record_id.clone());
            }
            return Err(RegistryError::Conflict {
                content_identifier: content.to_string(),
                record_id: existing.record_id.to_string(),
            });
        }

        file.next_id += 1;
        let record_id = RecordRef::new(file.next_id.to_string());
        file.records.push(RegistryEntry {
            record_id: record_id.clone(),
            content_identifier: content.clone(),
            metadata_identifier: metadata.clone(),
            registered_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        });
        self.store(&file)?;
        Ok(record_id)
    }
}
