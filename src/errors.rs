use thiserror::Error;

/// Errors raised by world construction, the action registry, and the
/// persistence layer. Player-facing soft failures ("You can't go that
/// way.") are ordinary response strings and never pass through here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (store directory creation, config files).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around TOML config parse errors.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// A zone referenced by name does not exist.
    #[error("Zone {0} does not exist.")]
    ZoneNotFound(String),

    /// A room referenced by name does not exist in the named zone.
    #[error("Room {room} does not exist in zone {zone}.")]
    RoomNotFound { zone: String, room: String },

    /// A world-level entity (item, npc, mob, quest, recipe, achievement)
    /// referenced by a setup call does not exist.
    #[error("{kind} {name} does not exist.")]
    EntityNotFound { kind: &'static str, name: String },

    /// A player referenced by id is not in the world.
    #[error("Player {0} does not exist.")]
    PlayerNotFound(String),

    /// A quest already has a start or end action registered.
    #[error("Quest {quest} already has an action for {phase}.")]
    QuestActionExists { quest: String, phase: &'static str },

    /// Zone has no room flagged as its starter.
    #[error("Zone {0} does not have a starter room.")]
    NoStarterRoom(String),

    /// Combat or resurrection attempted on an actor without stats.
    #[error("{0} has no stats.")]
    MissingStats(String),

    /// Completeness was evaluated for a quest that has no steps.
    #[error("Quest {0} has no steps.")]
    QuestHasNoSteps(String),

    /// The named exit does not exist on the named room.
    #[error("Exit {direction} does not exist in room {room}.")]
    ExitNotFound { room: String, direction: String },

    /// Returned when loading a save slot that is not present.
    #[error("save slot not found: {0}")]
    SlotNotFound(String),
}
