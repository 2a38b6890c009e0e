use serde::Deserialize;

use crate::{
    counter::{container::ContainerCounter, plates::PlatesCounter, stove::StoveCounter, Counter},
    item::Item,
};

/// One counter in a kitchen layout file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CounterSpec {
    pub name: String,
    pub kind: CounterKind,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub enum CounterKind {
    Clear,
    Container {
        item: Item,
    },
    Plates {
        plate: Item,
        spawn_interval: f32,
        max_plates: u32,
    },
    Trash,
    Stove,
}

impl CounterKind {
    /// Items that must exist in the catalog for this counter to work.
    pub fn referenced_items(&self) -> Vec<&Item> {
        match self {
            CounterKind::Container { item } => vec![item],
            CounterKind::Plates { plate, .. } => vec![plate],
            CounterKind::Clear | CounterKind::Trash | CounterKind::Stove => vec![],
        }
    }
}

impl From<&CounterKind> for Counter {
    fn from(kind: &CounterKind) -> Self {
        match kind {
            CounterKind::Clear => Counter::Clear,
            CounterKind::Container { item } => Counter::Container(ContainerCounter::new(item.clone())),
            CounterKind::Plates {
                plate,
                spawn_interval,
                max_plates,
            } => Counter::Plates(PlatesCounter::new(
                plate.clone(),
                *spawn_interval,
                *max_plates,
            )),
            CounterKind::Trash => Counter::Trash,
            CounterKind::Stove => Counter::Stove(StoveCounter::default()),
        }
    }
}
