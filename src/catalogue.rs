//! Directory-backed profile catalogue.
//!
//! Each profile is one JSON file (`<name>.json`) in the profiles directory
//! holding a serialized [`Preset`]. Profile names are opaque strings with no
//! implicit meaning; they only exist to refer to profiles later.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::error::CatalogueError;
use crate::types::Preset;

/// Manages a flat directory of preset profiles.
#[derive(Debug, Clone)]
pub struct Catalogue {
    profiles_dir: PathBuf,
}

impl Catalogue {
    /// Open a catalogue over an existing directory.
    pub fn new(profiles_dir: impl Into<PathBuf>) -> Result<Self, CatalogueError> {
        let profiles_dir = profiles_dir.into();
        if !profiles_dir.is_dir() {
            return Err(CatalogueError::NotADirectory(profiles_dir));
        }
        Ok(Self { profiles_dir })
    }

    /// Names of all the profiles in the catalogue, sorted.
    pub fn names(&self) -> Result<Vec<String>, CatalogueError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.profiles_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                entries.push(stem.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }

    /// Load one profile by name.
    pub fn get(&self, name: &str) -> Result<Preset, CatalogueError> {
        let path = self.profile_path(name)?;
        let data = fs::read(&path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                CatalogueError::NotFound(name.to_string())
            } else {
                CatalogueError::Io(err)
            }
        })?;
        serde_json::from_slice(&data).map_err(|source| CatalogueError::Parse {
            name: name.to_string(),
            source,
        })
    }

    /// Load several profiles, in the order the names were given.
    pub fn get_all(&self, names: &[String]) -> Result<Vec<Preset>, CatalogueError> {
        names.iter().map(|name| self.get(name)).collect()
    }

    /// Store a preset under its own name, replacing any previous version.
    pub fn add(&self, preset: &Preset) -> Result<(), CatalogueError> {
        let path = self.profile_path(&preset.name)?;
        let data = serde_json::to_vec_pretty(preset).map_err(CatalogueError::Encode)?;
        fs::write(&path, data)?;
        debug!(name = %preset.name, "preset stored");
        Ok(())
    }

    /// Resolve a profile name to its file, rejecting names that would escape
    /// the profiles directory.
    fn profile_path(&self, name: &str) -> Result<PathBuf, CatalogueError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(CatalogueError::InvalidName(name.to_string()));
        }
        Ok(self.profiles_dir.join(format!("{}.json", name)))
    }
}
