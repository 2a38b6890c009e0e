use bevy::ecs::{entity::Entity, event::Event};

use crate::{counter::stove::StoveState, item::Item, kitchen_object::KitchenObjectId};

/// Notifications from the kitchen to presentation collaborators (animation, audio,
/// progress bars, plate icons, scoring). Fire and forget.
///
/// All kinds share one bus owned by the session: it is cleared when a session opens
/// and again when it closes, so nothing from a previous shift is delivered into the
/// next one.
#[derive(Event, Clone, Debug, PartialEq)]
pub enum KitchenEvent {
    /// A container counter handed out a fresh object.
    ObjectGrabbed { counter: Entity, item: Item },
    /// A plate became available on a plates counter.
    PlateSpawned { counter: Entity, plates: u32 },
    /// A chef took a plate from a plates counter.
    PlateRemoved { counter: Entity, plates: u32 },
    /// An object was thrown away. Observable by anyone, not just the counter's visuals.
    ObjectTrashed { counter: Entity, item: Item },
    StoveStateChanged { counter: Entity, state: StoveState },
    /// Normalized progress of the stove's current timed step.
    StoveProgressChanged { counter: Entity, progress: f32 },
    IngredientPlated { plate: KitchenObjectId, item: Item },
}
