//! Save-slot persistence over sled.
//!
//! Each save is a full [`PlayerProgress`] snapshot (player plus world)
//! serialized with bincode, keyed by `player_id:slot`. The action registry
//! is deliberately not persisted: callbacks are code, and re-registering
//! them at startup is the world-building code's job. Loading replaces the
//! engine's world and the caller's player copy; registered actions keep
//! working because the registry is untouched.

use std::path::Path;

use chrono::Utc;
use log::info;

use crate::errors::EngineError;
use crate::types::{Player, PlayerProgress};
use crate::world::Engine;

/// A sled-backed store of progress snapshots.
pub struct ProgressStore {
    db: sled::Db,
}

impl ProgressStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        Ok(Self {
            db: sled::open(path)?,
        })
    }

    pub fn save(&self, key: &str, progress: &PlayerProgress) -> Result<(), EngineError> {
        let bytes = bincode::serialize(progress)?;
        self.db.insert(key.as_bytes(), bytes)?;
        self.db.flush()?;
        Ok(())
    }

    pub fn load(&self, key: &str) -> Result<Option<PlayerProgress>, EngineError> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Remove a key, reporting whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool, EngineError> {
        let existed = self.db.remove(key.as_bytes())?.is_some();
        self.db.flush()?;
        Ok(existed)
    }
}

fn progress_key(player_id: &str, slot: &str) -> String {
    format!("{}:{}", player_id, slot)
}

impl Engine {
    /// Snapshot the player and world into a named save slot.
    pub async fn save_player_progress(
        &mut self,
        player: &Player,
        slot: &str,
    ) -> Result<String, EngineError> {
        let mut world = self.world.clone();
        // The stored copy of the player may be stale mid-command; the
        // caller's copy is authoritative.
        if let Some(stored) = world.players.iter_mut().find(|p| p.id == player.id) {
            *stored = player.clone();
        } else {
            world.players.push(player.clone());
        }

        let progress = PlayerProgress {
            player: player.clone(),
            world,
            saved_at: Utc::now(),
        };
        let store = ProgressStore::open(&self.config.progress_db_path)?;
        store.save(&progress_key(&player.id, slot), &progress)?;
        info!("saved progress for {} to slot {}", player.name, slot);
        Ok(format!("Progress has been saved to slot {}.", slot))
    }

    /// Restore a named save slot, replacing the world and the caller's
    /// player copy. Missing slots are a soft failure.
    pub async fn load_player_progress(
        &mut self,
        player: &mut Player,
        slot: &str,
    ) -> Result<String, EngineError> {
        let store = ProgressStore::open(&self.config.progress_db_path)?;
        let Some(progress) = store.load(&progress_key(&player.id, slot))? else {
            return Ok(format!("Unable to load progress from slot {}.", slot));
        };

        *player = progress.player;
        self.world = progress.world;
        self.put_player(player.clone());
        info!("loaded progress for {} from slot {}", player.name, slot);
        Ok(format!("Progress has been loaded from slot {}.", slot))
    }

    /// Drop a save slot for a player. Removing a slot that was never
    /// saved is an error.
    pub fn remove_player_progress(&self, player_id: &str, slot: &str) -> Result<(), EngineError> {
        let store = ProgressStore::open(&self.config.progress_db_path)?;
        if !store.remove(&progress_key(player_id, slot))? {
            return Err(EngineError::SlotNotFound(slot.to_string()));
        }
        Ok(())
    }
}
