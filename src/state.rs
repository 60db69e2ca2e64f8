use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result, bail};

use crate::data::loader::load_file;
use crate::data::model::TitleStore;

// ---------------------------------------------------------------------------
// Catalog source – load once, reuse until the file changes
// ---------------------------------------------------------------------------

/// Identity of a file's current contents, as far as metadata can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

impl Fingerprint {
    fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("reading metadata of {}", path.display()))?;
        Ok(Fingerprint {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

#[derive(Debug)]
struct Cached {
    fingerprint: Fingerprint,
    store: Arc<TitleStore>,
}

/// Handle to a catalog file and the store loaded from it.
///
/// The store is read on first access and shared afterwards. It is only
/// re-read when the file's size or modification time changes; a loaded
/// store itself is never mutated.
#[derive(Debug)]
pub struct CatalogSource {
    path: PathBuf,
    /// Largest catalog we are willing to scan on every query.
    max_records: usize,
    cached: Option<Cached>,
}

impl CatalogSource {
    pub fn new(path: impl Into<PathBuf>, max_records: usize) -> Self {
        Self {
            path: path.into(),
            max_records,
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded store, reading the file only if it is new or has changed.
    pub fn store(&mut self) -> Result<Arc<TitleStore>> {
        let fingerprint = Fingerprint::of(&self.path)?;
        if let Some(cached) = &self.cached {
            if cached.fingerprint == fingerprint {
                log::info!("Reusing cached catalog {}", self.path.display());
                return Ok(Arc::clone(&cached.store));
            }
            log::info!("{} changed on disk, reloading", self.path.display());
        }

        let store = load_file(&self.path)?;
        if store.len() > self.max_records {
            bail!(
                "{} holds {} titles, more than the configured limit of {}",
                self.path.display(),
                store.len(),
                self.max_records
            );
        }
        log::info!(
            "Loaded {} titles ({} types, {} ratings) from {}",
            store.len(),
            store.facets().types.len(),
            store.facets().ratings.len(),
            self.path.display()
        );

        let store = Arc::new(store);
        self.cached = Some(Cached {
            fingerprint,
            store: Arc::clone(&store),
        });
        Ok(store)
    }
}
