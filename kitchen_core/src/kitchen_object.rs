use bevy::{
    app::{App, Plugin},
    ecs::{entity::Entity, system::Resource},
    reflect::Reflect,
    utils::HashMap,
};
use tracing::{debug, trace};

use crate::{
    item::{Item, ItemDefinition},
    plate::Plate,
};

pub struct KitchenObjectPlugin;

impl Plugin for KitchenObjectPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<KitchenObjectId>()
            .register_type::<Holder>()
            .init_resource::<KitchenObjects>();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct KitchenObjectId(u64);

impl std::fmt::Display for KitchenObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something that can hold at most one kitchen object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum Holder {
    Counter(Entity),
    Chef(Entity),
}

impl std::fmt::Display for Holder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Holder::Counter(entity) => write!(f, "counter {entity:?}"),
            Holder::Chef(entity) => write!(f, "chef {entity:?}"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("kitchen object {0} does not exist")]
    UnknownObject(KitchenObjectId),
    #[error("{holder} already holds kitchen object {occupant}")]
    HolderOccupied {
        holder: Holder,
        occupant: KitchenObjectId,
    },
    #[error("kitchen object {object} believes it is held by {holder}, which disagrees")]
    Inconsistent {
        object: KitchenObjectId,
        holder: Holder,
    },
}

/// A physical item in the kitchen. Always held by exactly one [`Holder`].
#[derive(Clone, Debug, PartialEq)]
pub struct KitchenObject {
    item: Item,
    holder: Holder,
    plate: Option<Plate>,
}

impl KitchenObject {
    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn holder(&self) -> Holder {
        self.holder
    }

    pub fn plate(&self) -> Option<&Plate> {
        self.plate.as_ref()
    }

    pub fn is_plate(&self) -> bool {
        self.plate.is_some()
    }
}

/// Arena of every live kitchen object, keyed by id.
///
/// The object's back-reference to its holder and the holder's reference to the
/// object live side by side in here and are only ever written together, so there is
/// no observable moment where an object has two holders or a holder points at an
/// object that has moved on.
#[derive(Resource, Default, Debug)]
pub struct KitchenObjects {
    next_id: u64,
    objects: HashMap<KitchenObjectId, KitchenObject>,
    held: HashMap<Holder, KitchenObjectId>,
}

impl KitchenObjects {
    /// Creates an object of `definition` directly in `holder`'s hands.
    pub fn spawn(
        &mut self,
        definition: &ItemDefinition,
        holder: Holder,
    ) -> Result<KitchenObjectId, OwnershipError> {
        self.ensure_free(holder)?;

        let id = KitchenObjectId(self.next_id);
        self.next_id += 1;

        self.objects.insert(
            id,
            KitchenObject {
                item: definition.item.clone(),
                holder,
                plate: definition.plate.as_ref().map(Plate::from),
            },
        );
        self.held.insert(holder, id);
        debug!(object = %id, item = %definition.item, %holder, "Spawned kitchen object");
        Ok(id)
    }

    /// Removes an object, emptying its holder's hands.
    pub fn destroy(&mut self, id: KitchenObjectId) -> Result<KitchenObject, OwnershipError> {
        let holder = self
            .objects
            .get(&id)
            .ok_or(OwnershipError::UnknownObject(id))?
            .holder;
        if self.held.get(&holder) != Some(&id) {
            return Err(OwnershipError::Inconsistent { object: id, holder });
        }

        self.held.remove(&holder);
        let object = self
            .objects
            .remove(&id)
            .ok_or(OwnershipError::UnknownObject(id))?;
        debug!(object = %id, item = %object.item, holder = %object.holder, "Destroyed kitchen object");
        Ok(object)
    }

    /// Moves an object to `to` in one step. Moving an object to its current holder is
    /// a no-op.
    pub fn reparent(&mut self, id: KitchenObjectId, to: Holder) -> Result<(), OwnershipError> {
        let from = self
            .objects
            .get(&id)
            .ok_or(OwnershipError::UnknownObject(id))?
            .holder;
        if from == to {
            return Ok(());
        }
        self.ensure_free(to)?;
        if self.held.get(&from) != Some(&id) {
            return Err(OwnershipError::Inconsistent {
                object: id,
                holder: from,
            });
        }

        self.held.remove(&from);
        self.held.insert(to, id);
        if let Some(object) = self.objects.get_mut(&id) {
            object.holder = to;
        }
        trace!(object = %id, %from, %to, "Reparented kitchen object");
        Ok(())
    }

    pub fn held_by(&self, holder: Holder) -> Option<KitchenObjectId> {
        self.held.get(&holder).copied()
    }

    pub fn is_holding(&self, holder: Holder) -> bool {
        self.held.contains_key(&holder)
    }

    pub fn get(&self, id: KitchenObjectId) -> Option<&KitchenObject> {
        self.objects.get(&id)
    }

    pub fn item(&self, id: KitchenObjectId) -> Option<&Item> {
        self.get(id).map(KitchenObject::item)
    }

    pub fn plate(&self, id: KitchenObjectId) -> Option<&Plate> {
        self.get(id).and_then(KitchenObject::plate)
    }

    pub fn plate_mut(&mut self, id: KitchenObjectId) -> Option<&mut Plate> {
        self.objects
            .get_mut(&id)
            .and_then(|object| object.plate.as_mut())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (KitchenObjectId, &KitchenObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    /// Drops every object, e.g. when a session is torn down.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.held.clear();
    }

    /// Verifies that every object and its holder agree with each other.
    pub fn check_consistency(&self) -> Result<(), OwnershipError> {
        for (id, object) in &self.objects {
            if self.held.get(&object.holder) != Some(id) {
                return Err(OwnershipError::Inconsistent {
                    object: *id,
                    holder: object.holder,
                });
            }
        }
        for (holder, id) in &self.held {
            match self.objects.get(id) {
                Some(object) if object.holder == *holder => {}
                Some(_) => {
                    return Err(OwnershipError::Inconsistent {
                        object: *id,
                        holder: *holder,
                    })
                }
                None => return Err(OwnershipError::UnknownObject(*id)),
            }
        }
        Ok(())
    }

    fn ensure_free(&self, holder: Holder) -> Result<(), OwnershipError> {
        match self.held.get(&holder) {
            Some(&occupant) => Err(OwnershipError::HolderOccupied { holder, occupant }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn tomato() -> ItemDefinition {
        ItemDefinition::new("Tomato")
    }

    fn counter(index: u32) -> Holder {
        Holder::Counter(Entity::from_raw(index))
    }

    fn chef(index: u32) -> Holder {
        Holder::Chef(Entity::from_raw(index))
    }

    #[test]
    fn spawn_binds_holder() {
        let mut objects = KitchenObjects::default();
        let id = objects.spawn(&tomato(), chef(0)).unwrap();
        assert_eq!(objects.held_by(chef(0)), Some(id));
        assert_eq!(objects.get(id).unwrap().holder(), chef(0));
        assert_eq!(objects.item(id), Some(&Item::new("Tomato")));
    }

    #[test]
    fn spawn_into_occupied_holder_fails() {
        let mut objects = KitchenObjects::default();
        let first = objects.spawn(&tomato(), chef(0)).unwrap();
        assert_eq!(
            objects.spawn(&tomato(), chef(0)),
            Err(OwnershipError::HolderOccupied {
                holder: chef(0),
                occupant: first
            })
        );
        assert_eq!(objects.len(), 1);
    }

    #[test]
    fn spawn_plate_carries_allow_list() {
        let mut objects = KitchenObjects::default();
        let definition = ItemDefinition::plate("Plate", vec![Item::new("Tomato")]);
        let id = objects.spawn(&definition, chef(0)).unwrap();
        assert!(objects.get(id).unwrap().is_plate());
        assert!(objects.plate_mut(id).unwrap().try_add_ingredient(&Item::new("Tomato")));
        assert_eq!(objects.plate(id).unwrap().ingredients(), &[Item::new("Tomato")]);
    }

    #[test]
    fn reparent_moves_both_sides() {
        let mut objects = KitchenObjects::default();
        let id = objects.spawn(&tomato(), chef(0)).unwrap();
        objects.reparent(id, counter(1)).unwrap();
        assert!(!objects.is_holding(chef(0)));
        assert_eq!(objects.held_by(counter(1)), Some(id));
        assert_eq!(objects.get(id).unwrap().holder(), counter(1));
        objects.check_consistency().unwrap();
    }

    #[test]
    fn reparent_onto_occupied_holder_fails_without_change() {
        let mut objects = KitchenObjects::default();
        let a = objects.spawn(&tomato(), chef(0)).unwrap();
        let b = objects.spawn(&tomato(), counter(1)).unwrap();
        assert_eq!(
            objects.reparent(a, counter(1)),
            Err(OwnershipError::HolderOccupied {
                holder: counter(1),
                occupant: b
            })
        );
        assert_eq!(objects.held_by(chef(0)), Some(a));
        assert_eq!(objects.held_by(counter(1)), Some(b));
    }

    #[test]
    fn reparent_to_current_holder_is_noop() {
        let mut objects = KitchenObjects::default();
        let id = objects.spawn(&tomato(), chef(0)).unwrap();
        objects.reparent(id, chef(0)).unwrap();
        assert_eq!(objects.held_by(chef(0)), Some(id));
    }

    #[test]
    fn destroy_empties_holder() {
        let mut objects = KitchenObjects::default();
        let id = objects.spawn(&tomato(), counter(3)).unwrap();
        let destroyed = objects.destroy(id).unwrap();
        assert_eq!(destroyed.item(), &Item::new("Tomato"));
        assert!(!objects.is_holding(counter(3)));
        assert!(objects.is_empty());
        assert_eq!(objects.destroy(id), Err(OwnershipError::UnknownObject(id)));
    }

    #[test]
    fn destroy_with_mismatched_holder_changes_nothing() {
        let mut objects = KitchenObjects::default();
        let stray = objects.spawn(&tomato(), chef(0)).unwrap();
        let occupant = objects.spawn(&tomato(), counter(1)).unwrap();
        objects.held.insert(chef(0), occupant);

        assert_eq!(
            objects.destroy(stray),
            Err(OwnershipError::Inconsistent {
                object: stray,
                holder: chef(0)
            })
        );
        assert!(objects.get(stray).is_some());
        assert_eq!(objects.held_by(chef(0)), Some(occupant));
        assert_eq!(objects.held_by(counter(1)), Some(occupant));
        assert_eq!(objects.len(), 2);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Spawn(u8),
        Move(u8, u8),
        Destroy(u8),
    }

    fn holder_from(index: u8) -> Holder {
        if index % 2 == 0 {
            chef(index as u32)
        } else {
            counter(index as u32)
        }
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..6).prop_map(Op::Spawn),
            (0u8..6, 0u8..6).prop_map(|(from, to)| Op::Move(from, to)),
            (0u8..6).prop_map(Op::Destroy),
        ]
    }

    proptest! {
        #[test]
        fn every_object_has_exactly_one_holder(ops in prop::collection::vec(arb_op(), 0..64)) {
            let mut objects = KitchenObjects::default();
            for op in ops {
                match op {
                    Op::Spawn(holder) => {
                        let _ = objects.spawn(&tomato(), holder_from(holder));
                    }
                    Op::Move(from, to) => {
                        if let Some(id) = objects.held_by(holder_from(from)) {
                            let _ = objects.reparent(id, holder_from(to));
                        }
                    }
                    Op::Destroy(holder) => {
                        if let Some(id) = objects.held_by(holder_from(holder)) {
                            objects.destroy(id).unwrap();
                        }
                    }
                }
                prop_assert_eq!(objects.check_consistency(), Ok(()));
                let holders: Vec<Holder> = objects.iter().map(|(_, o)| o.holder()).collect();
                let mut unique = holders.clone();
                unique.sort_by_key(|h| format!("{h:?}"));
                unique.dedup();
                prop_assert_eq!(unique.len(), holders.len());
            }
        }
    }
}
