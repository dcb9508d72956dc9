//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that manages storage lifecycle
//! and provides a context for executing CLI commands.
//!
//! # Example
//!
//! ```no_run
//! use quiver::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     // Execute commands using app...
//!     Ok(())
//! }
//! ```

use crate::commands::init::{find_quiver_root, QuiverConfig, CONFIG_FILE_NAME, QUIVER_DIR_NAME};
use crate::error::{ConfigError, Result};
use crate::storage::{create_storage, QueryStorage};
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
///
/// Manages storage initialization, lifecycle, and provides the execution
/// context for CLI commands. Storage is automatically loaded from the
/// quiver directory on creation.
pub struct App {
    /// The storage backend (trait object for polymorphism)
    storage: Box<dyn QueryStorage>,

    /// Path to the quiver directory (.quiver)
    quiver_dir: PathBuf,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("quiver_dir", &self.quiver_dir)
            .field("storage", &"<dyn QueryStorage>")
            .finish()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Searches up the directory tree to find a `.quiver/` directory,
    /// loads configuration, and initializes storage.
    ///
    /// # Arguments
    ///
    /// * `working_dir` - The directory to start searching from
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No quiver repository is found in the directory tree
    /// - Configuration cannot be loaded
    /// - Storage initialization fails
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        // Find quiver root directory
        let root_dir = find_quiver_root(working_dir).ok_or(ConfigError::NotInitialized)?;

        let quiver_dir = root_dir.join(QUIVER_DIR_NAME);
        let config_path = quiver_dir.join(CONFIG_FILE_NAME);

        // Load configuration
        let config = QuiverConfig::load(&config_path).await?;

        // Create storage based on configuration
        let backend = config.storage.to_backend(&root_dir)?;
        let storage = create_storage(backend).await?;

        Ok(Self {
            storage,
            quiver_dir,
        })
    }

    /// Get a mutable reference to the storage.
    pub fn storage_mut(&mut self) -> &mut dyn QueryStorage {
        self.storage.as_mut()
    }

    /// Get an immutable reference to the storage.
    #[must_use]
    pub fn storage(&self) -> &dyn QueryStorage {
        self.storage.as_ref()
    }

    /// Get the path to the quiver directory.
    #[must_use]
    pub fn quiver_dir(&self) -> &Path {
        &self.quiver_dir
    }

    /// Save storage state to persistent storage.
    ///
    /// This should be called after any mutating operations.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be written.
    pub async fn save(&self) -> Result<()> {
        self.storage.save().await
    }

    /// Reload storage state from persistent storage.
    ///
    /// Discards in-memory changes. Used after a failed save so memory and
    /// disk agree again.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be read.
    pub async fn reload(&mut self) -> Result<()> {
        self.storage.reload().await
    }
}
