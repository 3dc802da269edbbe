use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::GridSize;

use super::storage::{SETTINGS_KEY, Storage, TIMED_KEY};

/// Key names bound to each player command.
///
/// Names follow browser key values: single characters stand for
/// themselves, `" "` is the space bar and `"ArrowLeft"` etc. name the
/// arrow keys. Fields missing from stored data take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyConfig {
    pub move_up: String,
    pub move_down: String,
    pub move_left: String,
    pub move_right: String,
    pub rotate: String,
    pub rotate_counter: String,
    pub drop: String,
    pub hold: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            move_up: "ArrowUp".to_owned(),
            move_down: "ArrowDown".to_owned(),
            move_left: "ArrowLeft".to_owned(),
            move_right: "ArrowRight".to_owned(),
            rotate: "d".to_owned(),
            rotate_counter: "a".to_owned(),
            drop: " ".to_owned(),
            hold: "s".to_owned(),
        }
    }
}

impl KeyConfig {
    /// Returns `(command name, key)` pairs in display order.
    #[must_use]
    pub fn bindings(&self) -> [(&'static str, &str); 8] {
        [
            ("moveUp", &self.move_up),
            ("moveDown", &self.move_down),
            ("moveLeft", &self.move_left),
            ("moveRight", &self.move_right),
            ("rotate", &self.rotate),
            ("rotateCounter", &self.rotate_counter),
            ("drop", &self.drop),
            ("hold", &self.hold),
        ]
    }

    /// Returns a copy with every binding present in `update` replaced.
    #[must_use]
    pub fn merged(&self, update: &KeyConfigUpdate) -> Self {
        let pick = |new: Option<&String>, old: &String| new.unwrap_or(old).clone();
        Self {
            move_up: pick(update.move_up.as_ref(), &self.move_up),
            move_down: pick(update.move_down.as_ref(), &self.move_down),
            move_left: pick(update.move_left.as_ref(), &self.move_left),
            move_right: pick(update.move_right.as_ref(), &self.move_right),
            rotate: pick(update.rotate.as_ref(), &self.rotate),
            rotate_counter: pick(update.rotate_counter.as_ref(), &self.rotate_counter),
            drop: pick(update.drop.as_ref(), &self.drop),
            hold: pick(update.hold.as_ref(), &self.hold),
        }
    }
}

/// Partial [`KeyConfig`]; `None` fields keep their current binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyConfigUpdate {
    pub move_up: Option<String>,
    pub move_down: Option<String>,
    pub move_left: Option<String>,
    pub move_right: Option<String>,
    pub rotate: Option<String>,
    pub rotate_counter: Option<String>,
    pub drop: Option<String>,
    pub hold: Option<String>,
}

impl KeyConfigUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Preferences that survive restarts: key bindings, grid size and timed mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub key_config: KeyConfig,
    pub grid_size: GridSize,
    pub timed: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            key_config: KeyConfig::default(),
            grid_size: GridSize::default(),
            timed: true,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings<'a> {
    key_config: &'a KeyConfig,
    grid_size: GridSize,
}

impl Preferences {
    /// Reads preferences, falling back to the default of each field that is
    /// missing or malformed.
    pub fn load(storage: &dyn Storage) -> Self {
        let defaults = Self::default();
        let settings = storage
            .read(SETTINGS_KEY)
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok());

        let key_config = settings
            .as_ref()
            .and_then(|s| s.get("keyConfig"))
            .and_then(|v| KeyConfig::deserialize(v).ok())
            .unwrap_or(defaults.key_config);
        let grid_size = settings
            .as_ref()
            .and_then(|s| s.get("gridSize"))
            .and_then(Value::as_u64)
            .and_then(|n| u8::try_from(n).ok())
            .and_then(|n| GridSize::try_from(n).ok())
            .unwrap_or(defaults.grid_size);
        let timed = match storage.read(TIMED_KEY).as_deref() {
            Some("false") => false,
            Some("true") => true,
            _ => defaults.timed,
        };

        Self {
            key_config,
            grid_size,
            timed,
        }
    }

    /// Writes both the settings record and the timed flag.
    pub fn save(&self, storage: &mut dyn Storage) {
        let settings = StoredSettings {
            key_config: &self.key_config,
            grid_size: self.grid_size,
        };
        // serializing plain strings and integers cannot fail
        if let Ok(json) = serde_json::to_string(&settings) {
            storage.write(SETTINGS_KEY, &json);
        }
        storage.write(TIMED_KEY, if self.timed { "true" } else { "false" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;

    #[test]
    fn test_defaults_when_storage_empty() {
        let prefs = Preferences::load(&MemoryStorage::new());
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.key_config.rotate, "d");
        assert_eq!(prefs.key_config.drop, " ");
        assert_eq!(prefs.grid_size, GridSize::Four);
        assert!(prefs.timed);
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = MemoryStorage::new();
        let prefs = Preferences {
            key_config: KeyConfig {
                hold: "h".to_owned(),
                ..KeyConfig::default()
            },
            grid_size: GridSize::Five,
            timed: false,
        };
        prefs.save(&mut storage);
        assert_eq!(storage.read(TIMED_KEY).as_deref(), Some("false"));
        assert_eq!(Preferences::load(&storage), prefs);
    }

    #[test]
    fn test_settings_json_shape() {
        let mut storage = MemoryStorage::new();
        Preferences::default().save(&mut storage);
        let raw: Value = serde_json::from_str(&storage.read(SETTINGS_KEY).unwrap()).unwrap();
        assert_eq!(raw["gridSize"], 4);
        assert_eq!(raw["keyConfig"]["rotateCounter"], "a");
        assert_eq!(raw["keyConfig"]["moveLeft"], "ArrowLeft");
    }

    #[test]
    fn test_malformed_fields_fall_back_individually() {
        let storage = MemoryStorage::new()
            .with_value(SETTINGS_KEY, r#"{"keyConfig":{"rotate":"x"},"gridSize":9}"#)
            .with_value(TIMED_KEY, "maybe");
        let prefs = Preferences::load(&storage);
        assert_eq!(prefs.key_config.rotate, "x");
        assert_eq!(prefs.key_config.hold, "s");
        assert_eq!(prefs.grid_size, GridSize::Four);
        assert!(prefs.timed);

        let storage = MemoryStorage::new().with_value(SETTINGS_KEY, "{not json");
        assert_eq!(Preferences::load(&storage), Preferences::default());

        let storage = MemoryStorage::new().with_value(SETTINGS_KEY, r#"{"gridSize":5}"#);
        let prefs = Preferences::load(&storage);
        assert_eq!(prefs.grid_size, GridSize::Five);
        assert_eq!(prefs.key_config, KeyConfig::default());
    }

    #[test]
    fn test_merge_partial_update() {
        let update = KeyConfigUpdate {
            rotate: Some("e".to_owned()),
            drop: Some("Enter".to_owned()),
            ..KeyConfigUpdate::default()
        };
        let merged = KeyConfig::default().merged(&update);
        assert_eq!(merged.rotate, "e");
        assert_eq!(merged.drop, "Enter");
        assert_eq!(merged.rotate_counter, "a");
        assert!(KeyConfigUpdate::default().is_empty());
        assert!(!update.is_empty());
    }
}
