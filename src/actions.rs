//! The action registry: non-data behavior keyed by entity name.
//!
//! Entity data must stay cheaply cloneable and serializable (room
//! instancing, save/load), so callbacks are never stored on entities.
//! Instead each callback kind gets its own table here, keyed by the owning
//! entity's lowercased name (room tables use a composite `zone-room` key).
//!
//! Handlers are `Arc`-wrapped so a dispatch site can clone the handle out
//! of the registry and then call it with `&mut Engine` without holding a
//! borrow on the registry itself.
//!
//! Lookups on missing keys return `None` (orphan-safe); existence guards on
//! registration live on the [`Engine`](crate::world::Engine) methods that
//! know the entity store.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::EngineError;
use crate::types::{Description, Player, QuestionSequence};
use crate::world::Engine;

/// A plain content action: may produce text for the player.
pub type ActionFn = Arc<dyn Fn(&mut Engine, &mut Player) -> Option<String> + Send + Sync>;

/// A decision predicate (quest-step completion, achievement checks).
pub type DecisionFn = Arc<dyn Fn(&mut Engine, &mut Player) -> bool + Send + Sync>;

/// A parser action: receives the raw input, the command token, and the
/// filtered argument tokens. May fail with a content/programmer error,
/// which the resolver propagates to the hosting transport.
pub type CommandFn = Arc<
    dyn Fn(&mut Engine, &mut Player, &str, &str, &[String]) -> Result<String, EngineError>
        + Send
        + Sync,
>;

/// Future returned by an async parser action.
pub type CommandFuture<'a> = Pin<Box<dyn Future<Output = Result<String, EngineError>> + Send + 'a>>;

/// An async parser action (save/load and other I/O-bound commands).
pub type AsyncCommandFn = Arc<
    dyn for<'a> Fn(&'a mut Engine, &'a mut Player, &'a str, &'a str, &'a [String]) -> CommandFuture<'a>
        + Send
        + Sync,
>;

/// Action fired by a spawn-location timer tick.
pub type SpawnFn = Arc<dyn Fn(&mut Engine, &SpawnLocation) + Send + Sync>;

/// Completion callback for a finished question sequence.
pub type SessionFn =
    Arc<dyn Fn(&mut Engine, &mut Player, &QuestionSequence) -> Option<String> + Send + Sync>;

/// A named command with synonyms, dispatched when any synonym appears in
/// the generated combination list.
#[derive(Clone)]
pub struct CommandAction {
    pub name: String,
    pub descriptions: Vec<Description>,
    pub synonyms: Vec<String>,
    pub action: CommandFn,
}

impl CommandAction {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        synonyms: &[&str],
        action: CommandFn,
    ) -> Self {
        Self {
            name: name.into(),
            descriptions: Description::default_text(description),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            action,
        }
    }
}

/// An async command with synonyms.
#[derive(Clone)]
pub struct AsyncCommandAction {
    pub name: String,
    pub descriptions: Vec<Description>,
    pub synonyms: Vec<String>,
    pub action: AsyncCommandFn,
}

/// Start/end callbacks for a quest. Each phase may be registered once.
#[derive(Clone, Default)]
pub struct QuestAction {
    pub start: Option<ActionFn>,
    pub end: Option<ActionFn>,
}

/// One dialog trigger binding on an NPC or room object.
#[derive(Clone)]
pub struct DialogAction {
    pub trigger: Vec<String>,
    pub action: CommandFn,
}

/// A named repeating timer that mutates room state on each tick. Fired by
/// [`Engine::tick_spawn_locations`](crate::world::Engine), never by a
/// detached thread, so room mutation stays single-threaded.
#[derive(Clone)]
pub struct SpawnLocation {
    pub name: String,
    pub zone: String,
    pub room: String,
    pub interval: Duration,
    pub active: bool,
    pub started: bool,
    pub last_fired: Option<Instant>,
    pub action: SpawnFn,
}

/// All registry tables. Reset independently of the entity store so tests
/// can clear behavior without losing world data, and vice versa.
#[derive(Default)]
pub struct WorldActions {
    pub(crate) room_actions: HashMap<String, Vec<ActionFn>>,
    pub(crate) room_command_actions: HashMap<String, Vec<CommandAction>>,
    pub(crate) item_actions: HashMap<String, ActionFn>,
    pub(crate) quest_actions: HashMap<String, QuestAction>,
    pub(crate) quest_step_actions: HashMap<String, DecisionFn>,
    pub(crate) dialog_actions: HashMap<String, Vec<DialogAction>>,
    pub(crate) flag_actions: HashMap<String, ActionFn>,
    pub(crate) session_actions: HashMap<String, SessionFn>,
    pub(crate) achievement_checks: HashMap<String, DecisionFn>,
    pub(crate) spawn_locations: Vec<SpawnLocation>,
}

/// Composite key for room-scoped tables.
pub fn room_key(zone: &str, room: &str) -> String {
    format!("{}-{}", zone.to_lowercase(), room.to_lowercase())
}

fn name_key(name: &str) -> String {
    name.to_lowercase()
}

impl WorldActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every table. The entity store is untouched.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // Room enter actions: multiple registrations accumulate.

    pub fn push_room_action(&mut self, zone: &str, room: &str, action: ActionFn) {
        self.room_actions
            .entry(room_key(zone, room))
            .or_default()
            .push(action);
    }

    pub fn room_actions(&self, zone: &str, room: &str) -> Option<&Vec<ActionFn>> {
        self.room_actions.get(&room_key(zone, room))
    }

    // Room-local commands.

    pub fn push_room_command_action(&mut self, zone: &str, room: &str, action: CommandAction) {
        self.room_command_actions
            .entry(room_key(zone, room))
            .or_default()
            .push(action);
    }

    pub fn room_command_actions(&self, zone: &str, room: &str) -> Option<&Vec<CommandAction>> {
        self.room_command_actions.get(&room_key(zone, room))
    }

    pub fn remove_room_command_action(&mut self, zone: &str, room: &str, name: &str) {
        if let Some(actions) = self.room_command_actions.get_mut(&room_key(zone, room)) {
            actions.retain(|a| !a.name.eq_ignore_ascii_case(name));
        }
    }

    // Item use actions: single per item.

    pub fn set_item_action(&mut self, item: &str, action: ActionFn) {
        self.item_actions.insert(name_key(item), action);
    }

    pub fn item_action(&self, item: &str) -> Option<ActionFn> {
        self.item_actions.get(&name_key(item)).cloned()
    }

    // Quest actions: one per phase, double registration is an error.

    pub fn set_quest_start(&mut self, quest: &str, action: ActionFn) -> Result<(), EngineError> {
        let entry = self.quest_actions.entry(name_key(quest)).or_default();
        if entry.start.is_some() {
            return Err(EngineError::QuestActionExists {
                quest: quest.to_string(),
                phase: "start",
            });
        }
        entry.start = Some(action);
        Ok(())
    }

    pub fn set_quest_end(&mut self, quest: &str, action: ActionFn) -> Result<(), EngineError> {
        let entry = self.quest_actions.entry(name_key(quest)).or_default();
        if entry.end.is_some() {
            return Err(EngineError::QuestActionExists {
                quest: quest.to_string(),
                phase: "end",
            });
        }
        entry.end = Some(action);
        Ok(())
    }

    pub fn quest_action(&self, quest: &str) -> Option<&QuestAction> {
        self.quest_actions.get(&name_key(quest))
    }

    // Quest step predicates: single, optional.

    pub fn set_quest_step_action(&mut self, step: &str, action: DecisionFn) {
        self.quest_step_actions.insert(name_key(step), action);
    }

    pub fn quest_step_action(&self, step: &str) -> Option<DecisionFn> {
        self.quest_step_actions.get(&name_key(step)).cloned()
    }

    // Dialog actions: list per dialog id.

    pub fn push_dialog_action(&mut self, dialog_id: &str, action: DialogAction) {
        self.dialog_actions
            .entry(name_key(dialog_id))
            .or_default()
            .push(action);
    }

    pub fn dialog_actions(&self, dialog_id: &str) -> Option<&Vec<DialogAction>> {
        self.dialog_actions.get(&name_key(dialog_id))
    }

    // Flag actions: re-registration replaces silently.

    pub fn set_flag_action(&mut self, flag: &str, action: ActionFn) {
        self.flag_actions.insert(name_key(flag), action);
    }

    pub fn flag_action(&self, flag: &str) -> Option<ActionFn> {
        self.flag_actions.get(&name_key(flag)).cloned()
    }

    // Session completion actions.

    pub fn set_session_action(&mut self, session: &str, action: SessionFn) {
        self.session_actions.insert(name_key(session), action);
    }

    pub fn session_action(&self, session: &str) -> Option<SessionFn> {
        self.session_actions.get(&name_key(session)).cloned()
    }

    // Achievement predicates.

    pub fn set_achievement_check(&mut self, achievement: &str, check: DecisionFn) {
        self.achievement_checks.insert(name_key(achievement), check);
    }

    pub fn achievement_check(&self, achievement: &str) -> Option<DecisionFn> {
        self.achievement_checks.get(&name_key(achievement)).cloned()
    }

    // Spawn locations.

    pub fn push_spawn_location(&mut self, location: SpawnLocation) {
        self.spawn_locations.push(location);
    }

    pub fn spawn_location_mut(&mut self, name: &str) -> Option<&mut SpawnLocation> {
        self.spawn_locations
            .iter_mut()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn remove_spawn_location(&mut self, name: &str) {
        self.spawn_locations
            .retain(|l| !l.name.eq_ignore_ascii_case(name));
    }
}
