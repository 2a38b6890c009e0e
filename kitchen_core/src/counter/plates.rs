use bevy::{ecs::entity::Entity, reflect::Reflect};
use tracing::{debug, warn};

use super::KitchenContext;
use crate::{
    chef::Chef,
    event::KitchenEvent,
    item::Item,
    kitchen_object::OwnershipError,
};

/// Accrues clean plates over time while the session is playing, up to `max_plates`.
/// Plates are only counted here; a physical plate exists once a chef takes one.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct PlatesCounter {
    plate: Item,
    spawn_interval: f32,
    max_plates: u32,
    plates: u32,
    timer: f32,
}

impl PlatesCounter {
    pub fn new(plate: Item, spawn_interval: f32, max_plates: u32) -> Self {
        Self {
            plate,
            spawn_interval,
            max_plates,
            plates: 0,
            timer: 0.,
        }
    }

    pub fn plates(&self) -> u32 {
        self.plates
    }

    pub fn max_plates(&self) -> u32 {
        self.max_plates
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub(super) fn reset(&mut self) {
        self.plates = 0;
        self.timer = 0.;
    }

    /// Every completed interval adds a plate when the session is active and the stack
    /// isn't full. A long `delta` completes several intervals at once.
    pub(super) fn advance(
        &mut self,
        counter: Entity,
        delta: f32,
        session_active: bool,
        kitchen: &mut KitchenContext,
    ) {
        if self.spawn_interval <= 0. {
            warn!(?counter, "Plates counter has no spawn interval");
            return;
        }

        self.timer += delta;
        if self.timer < self.spawn_interval {
            return;
        }
        let intervals = (self.timer / self.spawn_interval).floor();
        self.timer -= intervals * self.spawn_interval;

        if !session_active {
            return;
        }
        let room = self.max_plates.saturating_sub(self.plates);
        let spawned = room.min(intervals as u32);
        for _ in 0..spawned {
            self.plates += 1;
            kitchen.emit(KitchenEvent::PlateSpawned {
                counter,
                plates: self.plates,
            });
        }
    }

    pub(super) fn interact(
        &mut self,
        counter: Entity,
        chef: Entity,
        kitchen: &mut KitchenContext,
    ) -> Result<(), OwnershipError> {
        if Chef::is_carrying(chef, kitchen.objects) || self.plates == 0 {
            return Ok(());
        }
        let Some(definition) = kitchen.items.get(&self.plate) else {
            warn!(item = %self.plate, "Plates counter hands out an item missing from the catalog");
            return Ok(());
        };

        kitchen.objects.spawn(definition, Chef::holder(chef))?;
        self.plates -= 1;
        debug!(plates = self.plates, "Chef took a plate");
        kitchen.emit(KitchenEvent::PlateRemoved {
            counter,
            plates: self.plates,
        });
        Ok(())
    }
}
