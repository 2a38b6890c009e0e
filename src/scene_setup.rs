use bevy::{
    app::{App, Plugin},
    core::Name,
    ecs::{
        schedule::{NextState, OnEnter},
        system::{Commands, Res, ResMut},
    },
};
use kitchen_core::{chef::Chef, counter::Counter, session::SessionState, types::AppState};
use tracing::{debug, info};

use crate::loading::KitchenLayout;

pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Running), setup_kitchen);
    }
}

fn setup_kitchen(
    mut commands: Commands,
    layout: Res<KitchenLayout>,
    mut session: ResMut<NextState<SessionState>>,
) {
    for spec in &layout.0 {
        let counter = Counter::from(&spec.kind);
        debug!(name = %spec.name, kind = counter.kind_name(), "Spawning counter");
        commands.spawn((Name::new(spec.name.clone()), counter));
    }
    commands.spawn((Name::new("Chef"), Chef));

    info!(counters = layout.0.len(), "Kitchen is ready");
    session.set(SessionState::Playing);
}
