use std::fs;
use std::path::{Path, PathBuf};

use super::config_io::{ConfigError, write_private};
use crate::model::Credentials;

const CREDENTIALS_FILE: &str = "credentials.toml";

/// Where connection details persist between sessions.
pub trait CredentialStore: Send {
    /// Stored credentials, or `None` when nothing usable is stored.
    fn load(&self) -> Option<Credentials>;
    fn save(&self, credentials: &Credentials) -> Result<(), ConfigError>;
    fn clear(&self) -> Result<(), ConfigError>;
}

/// Credentials in a TOML file readable only by the owner.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCredentialStore { path: path.into() }
    }

    /// The store inside a config directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CREDENTIALS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<Credentials> {
        let text = fs::read_to_string(&self.path).ok()?;
        match toml::from_str::<Credentials>(&text) {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable credentials");
                None
            }
        }
    }

    fn save(&self, credentials: &Credentials) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(credentials)?;
        write_private(&self.path, &text)
    }

    fn clear(&self) -> Result<(), ConfigError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ConfigError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> Credentials {
        Credentials {
            organization: "contoso".into(),
            project: "Web".into(),
            team: "Core".into(),
            area_path: "Web\\Core".into(),
            token: "pat-123".into(),
            username: "ada@contoso.com".into(),
        }
    }

    #[test]
    fn absent_file_loads_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileCredentialStore::new(tmp.path().join("credentials.toml"));
        assert_eq!(store.load(), None);
        store.clear().unwrap();
    }

    #[test]
    fn save_load_clear() {
        let tmp = TempDir::new().unwrap();
        let store = FileCredentialStore::new(tmp.path().join("workboard").join("credentials.toml"));
        store.save(&sample()).unwrap();
        assert_eq!(store.load(), Some(sample()));
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn garbage_file_loads_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("credentials.toml");
        fs::write(&path, "organization = [").unwrap();
        assert_eq!(FileCredentialStore::new(path).load(), None);
    }
}
