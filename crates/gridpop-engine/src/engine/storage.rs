use std::collections::BTreeMap;

/// Key holding `{"keyConfig": ..., "gridSize": ...}`.
pub const SETTINGS_KEY: &str = "gridpop-settings";

/// Key holding `"true"` or `"false"`.
pub const TIMED_KEY: &str = "isTimed";

/// Key holding the JSON array of high-score entries.
pub const HIGH_SCORES_KEY: &str = "gridpop-high-scores";

/// String key-value store used for preferences and the high-score ledger.
///
/// The engine never touches the filesystem itself; the host decides where
/// values live. Writes are fire-and-forget from the engine's point of view:
/// a backend that fails to persist should record or report the failure on
/// its own side.
pub trait Storage {
    /// Returns the stored value, or `None` if the key is absent or unreadable.
    fn read(&self, key: &str) -> Option<String>;

    fn write(&mut self, key: &str, value: &str);
}

impl<S> Storage for &mut S
where
    S: Storage + ?Sized,
{
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) {
        (**self).write(key, value);
    }
}

/// In-memory [`Storage`], used by tests and headless runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    values: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.write(key, value);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}
