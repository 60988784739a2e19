//! The shared game session: one engine behind one lock.
//!
//! Every command takes the lock for its entire duration, so clicks,
//! purchases, autoclick ticks, saves, and loads are serialized and a
//! reader never sees a half-applied change. Views are owned copies and
//! outlive the lock guard.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clicker_types::{ClickOutcome, GameStateView, PointsView, TargetId, UpgradeView};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::RulesConfig;
use crate::engine::GameEngine;
use crate::save::{self, LoadError};

/// Errors from saving or loading the game.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Reading or writing the save file failed.
    #[error("save file I/O failed for {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The engine could not be serialized.
    #[error("failed to encode save document: {0}")]
    Encode(serde_json::Error),

    /// The save file exists but was rejected.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// What a load attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No save file exists; the game is unchanged.
    NoSaveFile,
    /// The save replaced the game state.
    Loaded,
}

/// A game engine shared between request handlers and the ticker.
#[derive(Debug)]
pub struct GameSession {
    engine: Mutex<GameEngine>,
    save_path: PathBuf,
}

impl GameSession {
    /// Start a fresh game that persists to `save_path`.
    pub fn new(rules: RulesConfig, save_path: PathBuf) -> Self {
        Self::from_engine(GameEngine::new(rules, Instant::now()), save_path)
    }

    /// Wrap an existing engine.
    pub fn from_engine(engine: GameEngine, save_path: PathBuf) -> Self {
        Self {
            engine: Mutex::new(engine),
            save_path,
        }
    }

    /// Path of the save file.
    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Register a manual click. Unknown targets award nothing.
    pub async fn click(&self, id: TargetId) -> ClickOutcome {
        let mut engine = self.engine.lock().await;
        let awarded = engine.register_click(id);
        ClickOutcome {
            awarded,
            points_total: engine.points(),
        }
    }

    /// Select a target. Returns the catalog priced for it, or `None` if
    /// the target does not exist.
    pub async fn select_target(&self, id: TargetId) -> Option<Vec<UpgradeView>> {
        let mut engine = self.engine.lock().await;
        if engine.select_target(id) {
            engine.upgrades_for(id)
        } else {
            None
        }
    }

    /// Purchase an upgrade by tag. See [`GameEngine::purchase`].
    pub async fn purchase(&self, tag: &str, target: Option<TargetId>) -> bool {
        self.engine.lock().await.purchase_upgrade(tag, target)
    }

    /// Purchase an upgrade and return the state right after it, in one
    /// critical section.
    pub async fn purchase_with_state(
        &self,
        tag: &str,
        target: Option<TargetId>,
    ) -> (bool, GameStateView) {
        let mut engine = self.engine.lock().await;
        let success = engine.purchase_upgrade(tag, target);
        (success, engine.state_view())
    }

    /// Full state view.
    pub async fn state(&self) -> GameStateView {
        self.engine.lock().await.state_view()
    }

    /// Balance view.
    pub async fn points(&self) -> PointsView {
        self.engine.lock().await.points_view()
    }

    /// The catalog priced for a target, or `None` if it does not exist.
    pub async fn upgrades_for(&self, id: TargetId) -> Option<Vec<UpgradeView>> {
        self.engine.lock().await.upgrades_for(id)
    }

    /// Run an autoclick tick if due. Returns the bonus, 0 when not due.
    pub async fn auto_tick(&self, now: Instant) -> u64 {
        self.engine.lock().await.run_auto_tick(now).unwrap_or(0)
    }

    /// Like [`auto_tick`](Self::auto_tick), but tells a due tick with no
    /// bonus apart from a tick that was not due.
    pub(crate) async fn try_auto_tick(&self, now: Instant) -> Option<u64> {
        self.engine.lock().await.run_auto_tick(now)
    }

    /// Write the game to the save file.
    ///
    /// The document goes to a sibling temporary file which is then renamed
    /// over the save file, all while the lock is held. If the rename fails
    /// the temporary file is removed.
    pub async fn save(&self) -> Result<(), SaveError> {
        let points = self.write_save().await?;
        info!(path = %self.save_path.display(), points, "Game saved");
        Ok(())
    }

    /// Like [`save`](Self::save), logged at debug level for periodic saves.
    pub(crate) async fn autosave(&self) -> Result<(), SaveError> {
        let points = self.write_save().await?;
        debug!(path = %self.save_path.display(), points, "Game autosaved");
        Ok(())
    }

    /// Encode and write under the lock. Returns the saved balance.
    async fn write_save(&self) -> Result<u64, SaveError> {
        let engine = self.engine.lock().await;
        let json = save::encode(&engine).map_err(SaveError::Encode)?;

        let tmp = temp_path(&self.save_path);
        tokio::fs::write(&tmp, json.as_bytes())
            .await
            .map_err(|source| SaveError::Io {
                path: tmp.clone(),
                source,
            })?;
        if let Err(source) = tokio::fs::rename(&tmp, &self.save_path).await {
            let cleanup = tokio::fs::remove_file(&tmp).await.err();
            if let Some(e) = cleanup.filter(|e| e.kind() != std::io::ErrorKind::NotFound) {
                warn!(path = %tmp.display(), error = %e, "Failed to remove temporary save file");
            }
            return Err(SaveError::Io {
                path: self.save_path.clone(),
                source,
            });
        }
        Ok(engine.points())
    }

    /// Replace the game with the contents of the save file.
    ///
    /// A missing file is not an error. A rejected document leaves the
    /// game untouched.
    pub async fn load(&self) -> Result<LoadOutcome, SaveError> {
        let mut engine = self.engine.lock().await;
        Self::load_into(&mut engine, &self.save_path).await
    }

    /// Load, then return the resulting state, in one critical section.
    ///
    /// The view is `None` when no save file exists.
    pub async fn load_with_state(
        &self,
    ) -> Result<(LoadOutcome, Option<GameStateView>), SaveError> {
        let mut engine = self.engine.lock().await;
        let outcome = Self::load_into(&mut engine, &self.save_path).await?;
        let view = (outcome == LoadOutcome::Loaded).then(|| engine.state_view());
        Ok((outcome, view))
    }

    async fn load_into(engine: &mut GameEngine, path: &Path) -> Result<LoadOutcome, SaveError> {
        let json = match tokio::fs::read_to_string(path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoadOutcome::NoSaveFile);
            }
            Err(source) => {
                return Err(SaveError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let restored = save::decode(&json, engine.rules().clone(), Instant::now())?;
        *engine = restored;
        info!(
            path = %path.display(),
            points = engine.points(),
            targets = engine.target_count(),
            "Game loaded"
        );
        Ok(LoadOutcome::Loaded)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use clicker_types::UpgradeKind;

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("clicker-session-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("save.json")
    }

    fn session_at(path: PathBuf) -> GameSession {
        GameSession::new(RulesConfig::default(), path)
    }

    #[tokio::test]
    async fn click_reports_award_and_total() {
        let session = session_at(scratch_path("click"));
        let outcome = session.click(TargetId(1)).await;
        assert_eq!(outcome, ClickOutcome { awarded: 1, points_total: 1 });
        let missing = session.click(TargetId(8)).await;
        assert_eq!(missing, ClickOutcome { awarded: 0, points_total: 1 });
    }

    #[tokio::test]
    async fn select_returns_priced_catalog() {
        let session = session_at(scratch_path("select"));
        assert!(session.select_target(TargetId(2)).await.is_none());
        let upgrades = session.select_target(TargetId(1)).await.unwrap();
        assert_eq!(upgrades.len(), 5);
        assert_eq!(session.state().await.selected_target, TargetId(1));
    }

    #[tokio::test]
    async fn concurrent_clicks_are_all_counted() {
        let session = Arc::new(session_at(scratch_path("concurrent")));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let session = Arc::clone(&session);
            handles.push(tokio::spawn(async move {
                for _ in 0..25 {
                    session.click(TargetId(1)).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        let points = session.points().await;
        assert_eq!(points.points, 200);
        assert_eq!(points.total_clicks, 200);
    }

    #[tokio::test]
    async fn auto_tick_reports_zero_when_not_due() {
        let session = session_at(scratch_path("autotick"));
        for _ in 0..50 {
            session.click(TargetId(1)).await;
        }
        assert!(session.purchase("AutoClicker", Some(TargetId(1))).await);
        assert_eq!(session.auto_tick(Instant::now()).await, 0);
        let later = Instant::now() + std::time::Duration::from_secs(4);
        assert_eq!(session.auto_tick(later).await, 1);
        assert_eq!(session.points().await.points, 1);
    }

    #[tokio::test]
    async fn load_without_file_changes_nothing() {
        let path = scratch_path("missing");
        let _ = std::fs::remove_file(&path);
        let session = session_at(path);
        session.click(TargetId(1)).await;
        assert_eq!(session.load().await.unwrap(), LoadOutcome::NoSaveFile);
        assert_eq!(session.points().await.points, 1);
    }

    #[tokio::test]
    async fn save_then_load_restores_state() {
        let path = scratch_path("roundtrip");
        let session = session_at(path.clone());
        for _ in 0..10 {
            session.click(TargetId(1)).await;
        }
        assert!(session.purchase(UpgradeKind::ClickPower.tag(), Some(TargetId(1))).await);
        session.click(TargetId(1)).await;
        session.save().await.unwrap();
        assert!(!temp_path(&path).exists());

        let other = session_at(path);
        assert_eq!(other.load().await.unwrap(), LoadOutcome::Loaded);
        assert_eq!(other.state().await, session.state().await);
        assert_eq!(other.points().await.points, 2);
    }

    #[tokio::test]
    async fn corrupt_file_leaves_game_untouched() {
        let path = scratch_path("corrupt");
        std::fs::write(&path, "{ definitely not a save").unwrap();
        let session = session_at(path);
        session.click(TargetId(1)).await;
        let before = session.state().await;

        let result = session.load().await;
        assert!(matches!(result, Err(SaveError::Load(LoadError::Malformed { .. }))));
        assert_eq!(session.state().await, before);
    }

    #[tokio::test]
    async fn save_into_missing_directory_is_io_error() {
        let path = std::env::temp_dir()
            .join(format!("clicker-absent-{}", std::process::id()))
            .join("nested")
            .join("save.json");
        let session = session_at(path);
        assert!(matches!(session.save().await, Err(SaveError::Io { .. })));
    }

    #[tokio::test]
    async fn load_with_state_returns_the_loaded_game() {
        let path = scratch_path("load-with-state");
        let session = session_at(path.clone());
        for _ in 0..4 {
            session.click(TargetId(1)).await;
        }
        session.save().await.unwrap();

        let other = session_at(path);
        let (outcome, view) = other.load_with_state().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(view.unwrap(), session.state().await);
    }

    #[tokio::test]
    async fn load_with_state_without_file_has_no_view() {
        let path = scratch_path("load-with-state-missing");
        let _ = std::fs::remove_file(&path);
        let session = session_at(path);
        let (outcome, view) = session.load_with_state().await.unwrap();
        assert_eq!(outcome, LoadOutcome::NoSaveFile);
        assert!(view.is_none());
    }

    #[tokio::test]
    async fn failed_rename_removes_temporary_file() {
        // A directory at the save path makes the rename fail after the
        // temporary file has been written.
        let path = scratch_path("rename-fails");
        let _ = std::fs::remove_file(&path);
        std::fs::create_dir_all(path.join("occupied")).unwrap();
        let session = session_at(path.clone());

        assert!(matches!(session.save().await, Err(SaveError::Io { .. })));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let tmp = temp_path(Path::new("/data/save.json"));
        assert_eq!(tmp, PathBuf::from("/data/save.json.tmp"));
    }
}
