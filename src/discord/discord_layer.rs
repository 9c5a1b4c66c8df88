// Discord layer - translation between serenity types and the core.
// No business logic lives here: events go in, outbound messages come out.

#[path = "events.rs"]
pub mod events;

#[path = "delivery.rs"]
pub mod delivery;

#[path = "directory.rs"]
pub mod directory;

#[path = "presence.rs"]
pub mod presence;

use crate::core::commands::DispatchEngine;
use std::sync::Arc;

/// Shared state handed to every poise callback.
pub struct Data {
    pub dispatcher: Arc<DispatchEngine>,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
