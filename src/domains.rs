// src/domains.rs
// =============================================================================
// Serves previously produced per-domain result documents.
//
// A document for domain `example.com` lives at `<data_dir>/example.com.json`
// and is returned byte for byte; this module never parses it.
// =============================================================================

use std::io;
use std::path::PathBuf;

use crate::error::{GateError, Result};

#[derive(Debug, Clone)]
pub struct DomainStore {
    data_dir: PathBuf,
}

impl DomainStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    // Reads the stored document for `name`
    //
    // Names that could escape the data directory are refused without
    // touching the filesystem.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        tracing::info!(domain = name, "Getting site map for domain");

        if !is_plain_name(name) {
            return Err(GateError::DomainDocumentUnavailable {
                name: name.to_string(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a plain domain name"),
            });
        }

        let path = self.data_dir.join(format!("{}.json", name));
        tokio::fs::read(&path)
            .await
            .map_err(|source| GateError::DomainDocumentUnavailable {
                name: name.to_string(),
                source,
            })
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\', '\0'])
}
