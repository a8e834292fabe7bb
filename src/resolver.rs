use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ReportError, Result};
use crate::report::record::FunctionCandidate;

/// Looks up possible definitions for a function or method name.
///
/// Implementations must be side-effect free from the reporter's point of
/// view. Candidates are returned in the resolver's own order; the reporter
/// treats the first one as the primary match.
pub trait FunctionResolver {
    fn lookup(&self, name: &str) -> Vec<FunctionCandidate>;
}

/// A resolver that never finds anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopResolver;

impl FunctionResolver for NoopResolver {
    fn lookup(&self, _name: &str) -> Vec<FunctionCandidate> {
        Vec::new()
    }
}

/// In-memory function table.
///
/// PHP function and method names are case-insensitive, so lookups fold
/// ASCII case. Candidates sharing a name keep insertion order.
#[derive(Debug, Default, Clone)]
pub struct FunctionCatalog {
    by_name: HashMap<String, Vec<FunctionCandidate>>,
}

impl FunctionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, candidate: FunctionCandidate) {
        self.by_name
            .entry(candidate.name.to_ascii_lowercase())
            .or_default()
            .push(candidate);
    }

    /// Number of distinct names in the catalog
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Load a catalog from a JSON array of `{ "name": ..., "file": ... }`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let candidates: Vec<FunctionCandidate> =
            serde_json::from_str(&content).map_err(|e| ReportError::Catalog {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut catalog = Self::new();
        for candidate in candidates {
            if candidate.name.trim().is_empty() {
                debug!("Skipping unnamed catalog entry in {}", path.display());
                continue;
            }
            catalog.insert(candidate);
        }

        info!("Loaded {} functions from {}", catalog.len(), path.display());
        Ok(catalog)
    }
}

impl FromIterator<FunctionCandidate> for FunctionCatalog {
    fn from_iter<I: IntoIterator<Item = FunctionCandidate>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for candidate in iter {
            catalog.insert(candidate);
        }
        catalog
    }
}

impl FunctionResolver for FunctionCatalog {
    fn lookup(&self, name: &str) -> Vec<FunctionCandidate> {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}
