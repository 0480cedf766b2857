//! Registry save/load.
//!
//! The registry is stored as a TOML document with one `[[controllers]]` table
//! per configuration. Live adapters, callbacks and edge-trigger state are never
//! written; calibration and preset bindings travel through snapshots that only
//! exist while a save or load is in progress.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::Registry;
use crate::error::Result;

/// Keeps the pre-save snapshots alive for as long as it is held and clears
/// them on drop, including on early return.
struct SnapshotWindow<'a> {
    registry: &'a mut Registry,
}

impl<'a> SnapshotWindow<'a> {
    fn open(registry: &'a mut Registry) -> Result<Self> {
        let window = Self { registry };
        window.registry.on_pre_serialize()?;
        Ok(window)
    }
}

impl Drop for SnapshotWindow<'_> {
    fn drop(&mut self) {
        self.registry.release_persisted();
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp = temp_path(path);
    let written = File::create(&temp).and_then(|mut file| {
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    });

    if let Err(e) = written.and_then(|()| fs::rename(&temp, path)) {
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }
    Ok(())
}

impl Registry {
    /// Renders the registry as TOML.
    ///
    /// # Errors
    ///
    /// Fails if a configuration cannot be captured or TOML encoding fails.
    /// Snapshots are cleared either way.
    pub fn to_toml_string(&mut self) -> Result<String> {
        let window = SnapshotWindow::open(self)?;
        let text = toml::to_string_pretty(&*window.registry)?;
        Ok(text)
    }

    /// Parses a registry from TOML and runs the post-load hooks.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML, duplicate identities or calibration that does
    /// not fit the recreated adapter.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut registry: Registry = toml::from_str(contents)?;
        registry.on_post_deserialize()?;
        Ok(registry)
    }

    /// Writes the registry to `path`, replacing any existing file.
    ///
    /// The document is written to a sibling `.tmp` file first and renamed
    /// over the destination, so a failed save leaves the previous file intact.
    ///
    /// # Errors
    ///
    /// Returns capture, encoding and I/O errors to the caller.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use flybywire::registry::Registry;
    ///
    /// let mut registry = Registry::new();
    /// registry.serialize_to("state/controllers.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn serialize_to<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        write_atomically(path, &text)?;
        info!("Saved {} controller(s) to {}", self.len(), path.display());
        Ok(())
    }

    /// Reads a registry from `path`.
    ///
    /// # Errors
    ///
    /// Returns I/O errors, TOML errors and post-load hook errors.
    pub fn try_deserialize_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let registry = Self::from_toml_str(&contents)?;
        info!("Loaded {} controller(s) from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Reads a registry from `path`, returning `None` on any failure.
    ///
    /// The failure is logged; callers typically fall back to an empty registry.
    #[must_use]
    pub fn deserialize_from<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        match Self::try_deserialize_from(path) {
            Ok(registry) => Some(registry),
            Err(e) => {
                warn!("Could not load controller registry from {}: {}", path.display(), e);
                None
            }
        }
    }
}
