use std::sync::{Mutex, PoisonError};

use translator_core::Settings;

/// Source of provider configuration, read fresh for every job.
///
/// `load` never fails: a store that cannot be read hands back defaults.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Settings;

    /// Bumps the usage counter and returns the new value.
    fn record_dispatch(&self) -> u64;
}

#[derive(Debug, Default)]
struct MemoryInner {
    settings: Settings,
    translation_count: u64,
}

/// In-process store, used by tests and as the fallback when no file is given.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<MemoryInner>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                settings,
                translation_count: 0,
            }),
        }
    }

    pub fn replace(&self, settings: Settings) {
        self.lock().settings = settings;
    }

    pub fn translation_count(&self) -> u64 {
        self.lock().translation_count
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Settings {
        self.lock().settings.clone()
    }

    fn record_dispatch(&self) -> u64 {
        let mut inner = self.lock();
        inner.translation_count += 1;
        inner.translation_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use translator_core::ProviderId;

    #[test]
    fn replace_is_visible_on_next_load() {
        let store = MemorySettingsStore::default();
        assert_eq!(store.load().provider, ProviderId::GoogleTranslate);
        store.replace(Settings::default().with_provider(ProviderId::Mistral));
        assert_eq!(store.load().provider, ProviderId::Mistral);
    }

    #[test]
    fn dispatch_counter_counts_up() {
        let store = MemorySettingsStore::default();
        assert_eq!(store.record_dispatch(), 1);
        assert_eq!(store.record_dispatch(), 2);
        assert_eq!(store.translation_count(), 2);
    }
}
