//! Spawn locations: named repeating timers that mutate room state.
//!
//! Timers never run on their own threads. The hosting loop calls
//! [`Engine::tick_spawn_locations`] on whatever cadence it likes and each
//! started, active location whose interval has elapsed fires once per
//! tick. A freshly started location fires on the next tick.

use std::time::{Duration, Instant};

use log::debug;

use crate::actions::{SpawnFn, SpawnLocation};
use crate::errors::EngineError;
use crate::world::Engine;

impl Engine {
    /// Register a spawn location on an existing room. It stays dormant
    /// until started.
    pub fn create_spawn_location(
        &mut self,
        name: &str,
        zone_name: &str,
        room_name: &str,
        interval: Duration,
        action: SpawnFn,
    ) -> Result<(), EngineError> {
        if self.get_room(zone_name, room_name).is_none() {
            return Err(EngineError::RoomNotFound {
                zone: zone_name.to_string(),
                room: room_name.to_string(),
            });
        }
        self.actions.push_spawn_location(SpawnLocation {
            name: name.to_string(),
            zone: zone_name.to_string(),
            room: room_name.to_string(),
            interval,
            active: true,
            started: false,
            last_fired: None,
            action,
        });
        Ok(())
    }

    /// Start a spawn location's timer.
    pub fn start_spawn_location(&mut self, name: &str) -> Result<(), EngineError> {
        let location = self
            .actions
            .spawn_location_mut(name)
            .ok_or_else(|| EngineError::EntityNotFound {
                kind: "Spawn location",
                name: name.to_string(),
            })?;
        location.started = true;
        location.last_fired = None;
        Ok(())
    }

    /// Pause or resume a spawn location without discarding its timer.
    pub fn set_spawn_location_active(&mut self, name: &str, active: bool) -> Result<(), EngineError> {
        let location = self
            .actions
            .spawn_location_mut(name)
            .ok_or_else(|| EngineError::EntityNotFound {
                kind: "Spawn location",
                name: name.to_string(),
            })?;
        location.active = active;
        Ok(())
    }

    pub fn remove_spawn_location(&mut self, name: &str) {
        self.actions.remove_spawn_location(name);
    }

    /// Fire every started, active spawn location whose interval has
    /// elapsed. Returns how many fired.
    pub fn tick_spawn_locations(&mut self) -> usize {
        let now = Instant::now();
        let due: Vec<SpawnLocation> = self
            .actions
            .spawn_locations
            .iter_mut()
            .filter(|l| l.started && l.active)
            .filter(|l| match l.last_fired {
                Some(last) => now.duration_since(last) >= l.interval,
                None => true,
            })
            .map(|l| {
                l.last_fired = Some(now);
                l.clone()
            })
            .collect();

        for location in &due {
            debug!("spawn location {} fired", location.name);
            let action = location.action.clone();
            action(self, location);
        }
        due.len()
    }
}
