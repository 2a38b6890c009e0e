use bevy::{ecs::schedule::States, reflect::Reflect};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, States, Default, Reflect)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}
