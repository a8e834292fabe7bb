use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ReportError, Result};

pub const CONFIG_FILE: &str = ".eir.toml";

/// Eir report configuration (loaded from .eir.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EirConfig {
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub structured: StructuredConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Text report path
    #[serde(default = "default_report_file")]
    pub file: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file: default_report_file(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredConfig {
    /// Structured JSON-lines output (disabled when unset)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Function catalog used to resolve call-stack frames
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

fn default_report_file() -> PathBuf {
    PathBuf::from("scan-report.txt")
}

impl EirConfig {
    /// Try to load .eir.toml from the given directory or its parents.
    ///
    /// A file that exists but does not parse is an error; a missing file
    /// is not.
    pub fn load(start: &Path) -> Result<Option<Self>> {
        let Some(config_path) = find_config_file(start) else {
            debug!("No {} found above {}", CONFIG_FILE, start.display());
            return Ok(None);
        };
        debug!("Found config: {}", config_path.display());

        let content = std::fs::read_to_string(&config_path)?;
        let mut config: EirConfig = toml::from_str(&content).map_err(|e| {
            ReportError::Config(format!("{}: {}", config_path.display(), e))
        })?;

        // Relative paths are relative to the config file
        if let Some(base) = config_path.parent() {
            config.rebase(base);
        }

        info!("Loaded config from {}", config_path.display());
        Ok(Some(config))
    }

    fn rebase(&mut self, base: &Path) {
        let join = |p: &PathBuf| if p.is_relative() { base.join(p) } else { p.clone() };
        self.report.file = join(&self.report.file);
        self.structured.file = self.structured.file.as_ref().map(join);
        self.resolver.catalog = self.resolver.catalog.as_ref().map(join);
    }
}

/// Walk up from `start` to find .eir.toml
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let config = current.join(CONFIG_FILE);
        if config.exists() {
            return Some(config);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub const DEFAULT_CONFIG: &str = r#"# Eir report writer configuration

[report]
# Text report, appended to on every run
file = "scan-report.txt"

[structured]
# Structured JSON-lines output, one object per event. Omit to disable.
# file = "scan-report.jsonl"

[resolver]
# JSON array of { "name": ..., "file": ... } used to resolve the top
# frame of each call stack to its source file.
# catalog = "functions.json"
"#;

/// Create a default .eir.toml in `dir`. Returns false if one already exists.
pub fn init_config(dir: &Path) -> Result<bool> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        return Ok(false);
    }
    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses() {
        let config: EirConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.report.file, PathBuf::from("scan-report.txt"));
        assert!(config.structured.file.is_none());
        assert!(config.resolver.catalog.is_none());
    }

    #[test]
    fn test_load_walks_up_and_rebases() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE),
            "[report]\nfile = \"out/report.txt\"\n[resolver]\ncatalog = \"/abs/functions.json\"\n",
        )
        .unwrap();

        let config = EirConfig::load(&nested).unwrap().unwrap();
        assert_eq!(config.report.file, temp_dir.path().join("out/report.txt"));
        assert_eq!(config.resolver.catalog, Some(PathBuf::from("/abs/functions.json")));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "[report\n").unwrap();

        let err = EirConfig::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_init_config_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        assert!(init_config(temp_dir.path()).unwrap());
        assert!(!init_config(temp_dir.path()).unwrap());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join(CONFIG_FILE)).unwrap(),
            DEFAULT_CONFIG
        );
    }
}
