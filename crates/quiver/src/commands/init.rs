//! Implementation of the `init` command.
//!
//! This module handles initialization of a new quiver repository, creating
//! the `.quiver/` directory structure with configuration and data files.

use crate::error::{ConfigError, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the quiver directory
pub const QUIVER_DIR_NAME: &str = ".quiver";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the query data file
pub const QUERIES_FILE_NAME: &str = "queries.json";

/// Name of the gitignore file within .quiver
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Maximum directory depth to traverse when searching for the quiver root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure for quiver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuiverConfig {
    /// Storage configuration
    pub storage: StorageConfig,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage backend type ("archive" for file-backed, "memory" for
    /// ephemeral)
    pub backend: String,

    /// Path to the data file, relative to the repository root
    #[serde(rename = "data-file")]
    pub data_file: String,
}

impl StorageConfig {
    /// Resolve this configuration into a concrete storage backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownBackend` if the backend name is not
    /// recognized.
    pub fn to_backend(&self, root_dir: &Path) -> Result<StorageBackend> {
        match self.backend.as_str() {
            "archive" => Ok(StorageBackend::Archive(root_dir.join(&self.data_file))),
            "memory" => Ok(StorageBackend::InMemory),
            other => Err(ConfigError::UnknownBackend(other.to_string()).into()),
        }
    }
}

impl QuiverConfig {
    /// Create the default configuration: archive storage in the quiver
    /// directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: StorageConfig {
                backend: "archive".to_string(),
                data_file: format!("{QUIVER_DIR_NAME}/{QUERIES_FILE_NAME}"),
            },
        }
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for QuiverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created quiver directory
    pub quiver_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created queries data file
    pub queries_file: PathBuf,
    /// Path to the created gitignore file
    pub gitignore_file: PathBuf,
    /// Whether an existing repository was reinitialized (`--force`)
    pub reinitialized: bool,
}

/// Initialize a new quiver repository in the given directory.
///
/// Creates `.quiver/` with a configuration file, an empty queries data
/// file, and a `.gitignore`.
///
/// # Arguments
///
/// * `base_dir` - The base directory where `.quiver/` will be created
/// * `force` - Rewrite the configuration even if `.quiver/` already
///   exists. An existing data file is never touched.
///
/// # Errors
///
/// Returns an error if:
/// - The `.quiver/` directory already exists and `force` is false
/// - File system operations fail
pub async fn init(base_dir: &Path, force: bool) -> Result<InitResult> {
    let quiver_dir = base_dir.join(QUIVER_DIR_NAME);

    let reinitialized = quiver_dir.exists();
    if reinitialized && !force {
        return Err(ConfigError::AlreadyInitialized(QUIVER_DIR_NAME.to_string()).into());
    }

    // Create the .quiver directory
    fs::create_dir_all(&quiver_dir).await?;

    // Create config.yaml
    let config_file = quiver_dir.join(CONFIG_FILE_NAME);
    let config = QuiverConfig::new();
    config.save(&config_file).await?;

    // Create an empty queries.json unless one already exists; --force
    // must not clobber saved queries
    let queries_file = quiver_dir.join(QUERIES_FILE_NAME);
    if !queries_file.exists() {
        fs::write(&queries_file, "[]\n").await?;
    }

    // Create .gitignore inside .quiver
    let gitignore_file = quiver_dir.join(GITIGNORE_FILE_NAME);
    let gitignore_content = "\
# Quiver metadata files that should not be tracked
# The queries.json file should be tracked for collaboration
";
    fs::write(&gitignore_file, gitignore_content).await?;

    Ok(InitResult {
        quiver_dir,
        config_file,
        queries_file,
        gitignore_file,
        reinitialized,
    })
}

/// Check if a directory has been initialized with quiver.
///
/// Returns `true` if the `.quiver/` directory exists.
#[must_use]
pub fn is_initialized(base_dir: &Path) -> bool {
    base_dir.join(QUIVER_DIR_NAME).exists()
}

/// Find the quiver root directory by searching up the directory tree.
///
/// Starts from the given directory and traverses parent directories
/// until a `.quiver/` directory is found, the root is reached, or
/// the maximum traversal depth is exceeded.
///
/// # Returns
///
/// Returns `Some(path)` with the directory containing `.quiver/`,
/// or `None` if no quiver repository is found within the depth limit.
#[must_use]
pub fn find_quiver_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(QUIVER_DIR_NAME).exists() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
