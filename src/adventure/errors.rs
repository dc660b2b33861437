use thiserror::Error;

use crate::adventure::types::{ItemId, LocationId, MonsterId, QuestId};

/// Errors that can arise while running the adventure or touching its save file.
#[derive(Debug, Error)]
pub enum AdventureError {
    /// Catalog lookup with an identifier the world does not define.
    #[error("unknown item id: {0}")]
    UnknownItem(ItemId),

    #[error("unknown monster id: {0}")]
    UnknownMonster(MonsterId),

    #[error("unknown quest id: {0}")]
    UnknownQuest(QuestId),

    #[error("unknown location id: {0}")]
    UnknownLocation(LocationId),

    /// World data that resolves but breaks a rule, such as a drop chance over 100%.
    #[error("invalid world: {0}")]
    InvalidWorld(String),

    /// Saved player text could not be turned back into a player.
    #[error("malformed save: {0}")]
    MalformedSave(String),

    /// Player could not be written out as a save document.
    #[error("failed to encode save: {0}")]
    Encode(String),

    /// World seed JSON failed to parse.
    #[error("world seed error: {0}")]
    Seed(#[from] serde_json::Error),

    /// Wrapper around IO errors (reading seeds, writing saves, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::DeError> for AdventureError {
    fn from(err: quick_xml::DeError) -> Self {
        AdventureError::MalformedSave(err.to_string())
    }
}
