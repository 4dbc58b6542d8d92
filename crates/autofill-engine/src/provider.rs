//! Profile providers.
//!
//! Profile storage lives outside the engine. The auto-filler only asks a
//! [`ProfileProvider`] for the current profile; the file-backed and in-memory
//! providers here cover the CLI and tests.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::EngineError;
use crate::profile::Profile;

/// Source of the currently selected profile.
pub trait ProfileProvider: Send + Sync {
    /// The current profile, or `None` when nothing is loaded.
    fn get_profile(&self) -> Option<Profile>;
}

/// Reads a JSON profile from disk on every call.
#[derive(Debug, Clone)]
pub struct JsonProfileProvider {
    path: PathBuf,
}

impl JsonProfileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the profile, surfacing read and parse failures.
    pub fn load(&self) -> Result<Profile, EngineError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| EngineError::ProfileLoad {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let profile = serde_json::from_str(&content).map_err(|e| EngineError::ProfileLoad {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %self.path.display(), "Loaded profile");
        Ok(profile)
    }
}

impl ProfileProvider for JsonProfileProvider {
    fn get_profile(&self) -> Option<Profile> {
        self.load().ok()
    }
}

/// Serves a fixed profile.
#[derive(Debug, Clone, Default)]
pub struct StaticProfileProvider {
    profile: Option<Profile>,
}

impl StaticProfileProvider {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile: Some(profile),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl ProfileProvider for StaticProfileProvider {
    fn get_profile(&self) -> Option<Profile> {
        self.profile.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_json_provider_loads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"personal": {{"lastName": "Dupont"}}}}"#).unwrap();

        let provider = JsonProfileProvider::new(file.path());
        let profile = provider.get_profile().unwrap();
        assert_eq!(profile.text("personal", "lastName"), Some("Dupont"));
    }

    #[test]
    fn test_json_provider_missing_file() {
        let provider = JsonProfileProvider::new("/nonexistent/profile.json");
        assert!(provider.get_profile().is_none());
        assert!(matches!(
            provider.load(),
            Err(EngineError::ProfileLoad { .. })
        ));
    }

    #[test]
    fn test_json_provider_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        let provider = JsonProfileProvider::new(file.path());
        assert!(provider.load().is_err());
    }

    #[test]
    fn test_static_provider() {
        assert!(StaticProfileProvider::empty().get_profile().is_none());
        let mut profile = Profile::default();
        profile.set("personal", "firstName", "Marie");
        let provider = StaticProfileProvider::new(profile.clone());
        assert_eq!(provider.get_profile(), Some(profile));
    }
}
