use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use gridpop_engine::Storage;

/// [`Storage`] backed by one file per key inside a data directory.
///
/// Writes go through a temporary file and a rename so a crash never leaves a
/// half-written value behind. The engine treats storage as infallible, so a
/// failed write is kept here until the host takes it with
/// [`FileStorage::take_error`].
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    last_error: Option<anyhow::Error>,
}

impl FileStorage {
    pub fn open(dir: PathBuf) -> anyhow::Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Ok(Self {
            dir,
            last_error: None,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.last_error.take()
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn try_read(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn try_write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| {
            format!("Failed to move {} to {}", tmp.display(), path.display())
        })?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        // Unreadable files load as missing and fall back to defaults.
        self.try_read(key).ok().flatten()
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.try_write(key, value) {
            self.last_error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use gridpop_engine::{Action, Game, GridSize, HIGH_SCORES_KEY, SETTINGS_KEY, TIMED_KEY};

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("gridpop-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_write_then_read() {
        let dir = scratch_dir("roundtrip");
        let mut storage = FileStorage::open(dir.clone()).unwrap();
        assert_eq!(storage.read(TIMED_KEY), None);

        storage.write(TIMED_KEY, "false");
        assert_eq!(storage.read(TIMED_KEY).as_deref(), Some("false"));
        assert!(storage.take_error().is_none());
        assert!(dir.join("isTimed.json").is_file());
        assert!(!dir.join("isTimed.json.tmp").exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_failed_write_is_kept() {
        let dir = scratch_dir("failed-write");
        let mut storage = FileStorage::open(dir.clone()).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        storage.write(SETTINGS_KEY, "{}");
        let error = storage.take_error().unwrap();
        assert!(error.to_string().contains("Failed to write"));
        assert!(storage.take_error().is_none());
    }

    #[test]
    fn test_game_state_survives_reopen() {
        let dir = scratch_dir("reopen");
        let mut game = Game::new(FileStorage::open(dir.clone()).unwrap());
        game.dispatch(Action::ChangeGridSize(GridSize::Five));
        game.dispatch(Action::ToggleTimed(false));
        drop(game);

        let game = Game::new(FileStorage::open(dir.clone()).unwrap());
        assert_eq!(game.state().grid_size(), GridSize::Five);
        assert!(!game.state().is_timed());
        assert_eq!(game.storage().read(HIGH_SCORES_KEY), None);

        fs::remove_dir_all(dir).unwrap();
    }
}
