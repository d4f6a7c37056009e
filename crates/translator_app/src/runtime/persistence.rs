use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use translator_core::{CredentialSlot, ProviderId, Settings, DEFAULT_TARGET_LANGUAGE};
use translator_engine::SettingsStore;
use translator_logging::{mask_secret, tl_debug, tl_error, tl_info, tl_warn};

#[derive(Debug, Error)]
pub enum SettingsFileError {
    #[error("settings io error: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is not valid RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("settings could not be serialized: {0}")]
    Serialize(#[from] ron::Error),
}

/// On-disk shape. Key names match the extension's storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PersistedSettings {
    target_language: String,
    translation_service: String,
    gemini_api_key: String,
    openrouter_api_key: String,
    translation_count: u64,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            translation_service: ProviderId::default().as_key().to_string(),
            gemini_api_key: String::new(),
            openrouter_api_key: String::new(),
            translation_count: 0,
        }
    }
}

impl PersistedSettings {
    fn to_settings(&self) -> Settings {
        let mut settings = Settings::default()
            .with_target_language(self.target_language.clone())
            .with_provider(ProviderId::from_key_or_default(&self.translation_service));
        for (slot, secret) in [
            (CredentialSlot::Gemini, &self.gemini_api_key),
            (CredentialSlot::OpenRouter, &self.openrouter_api_key),
        ] {
            if !secret.trim().is_empty() {
                settings = settings.with_credential(slot, secret.clone());
            }
        }
        settings
    }

    fn apply(&mut self, settings: &Settings) {
        self.target_language = settings.target_language.clone();
        self.translation_service = settings.provider.as_key().to_string();
        self.gemini_api_key = settings
            .credentials
            .get(&CredentialSlot::Gemini)
            .cloned()
            .unwrap_or_default();
        self.openrouter_api_key = settings
            .credentials
            .get(&CredentialSlot::OpenRouter)
            .cloned()
            .unwrap_or_default();
    }
}

/// Settings kept in a RON file, rewritten atomically on every change.
///
/// Reads happen on every `load`, so edits made to the file while the
/// translator runs are picked up by the next job.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Writes `settings`, keeping the stored usage counter.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsFileError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut persisted = self.read_persisted().unwrap_or_default();
        persisted.apply(settings);
        self.write_persisted(&persisted)?;
        tl_info!(
            "Saved settings to {:?} (service={}, gemini key={})",
            self.path,
            persisted.translation_service,
            mask_secret(&persisted.gemini_api_key)
        );
        Ok(())
    }

    pub fn translation_count(&self) -> u64 {
        self.read_persisted()
            .map(|persisted| persisted.translation_count)
            .unwrap_or(0)
    }

    fn read_persisted(&self) -> Result<PersistedSettings, SettingsFileError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(PersistedSettings::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(ron::from_str(&content)?)
    }

    fn write_persisted(&self, persisted: &PersistedSettings) -> Result<(), SettingsFileError> {
        let content = ron::ser::to_string_pretty(persisted, ron::ser::PrettyConfig::new())?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Settings {
        match self.read_persisted() {
            Ok(persisted) => persisted.to_settings(),
            Err(err) => {
                tl_warn!("Failed to read settings from {:?}: {}", self.path, err);
                Settings::default()
            }
        }
    }

    fn record_dispatch(&self) -> u64 {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut persisted = match self.read_persisted() {
            Ok(persisted) => persisted,
            Err(err) => {
                // An unreadable file is left alone rather than overwritten.
                tl_warn!("Usage counter not updated, {:?} unreadable: {}", self.path, err);
                return 0;
            }
        };
        persisted.translation_count += 1;
        if let Err(err) = self.write_persisted(&persisted) {
            tl_error!("Failed to write usage counter to {:?}: {}", self.path, err);
        } else {
            tl_debug!("translationCount={}", persisted.translation_count);
        }
        persisted.translation_count
    }
}
