use bevy::{
    app::{App, Plugin, Update},
    ecs::{
        event::{Event, EventReader, Events},
        schedule::{
            common_conditions::in_state, IntoSystemConfigs, NextState, OnEnter, OnExit, State,
            States,
        },
        system::{Query, Res, ResMut, Resource},
    },
    reflect::Reflect,
    time::Time,
};
use tracing::{debug, info};

use crate::{
    counter::{Counter, CounterSet},
    event::KitchenEvent,
    kitchen_object::KitchenObjects,
};

/// Lifecycle of one shift in the kitchen. Only `Playing` counts as an active session:
/// stoves keep cooking in every state except `Paused`, but plates only accrue while
/// `Playing`.
#[derive(States, Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Reflect)]
pub enum SessionState {
    #[default]
    WaitingToStart,
    Playing,
    Paused,
    GameOver,
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        *self == SessionState::Playing
    }
}

#[derive(Resource, Clone, Debug, Reflect)]
pub struct SessionSettings {
    /// Seconds of `Playing` before the shift ends.
    pub shift_length: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { shift_length: 300. }
    }
}

/// Counts down while the session is playing.
#[derive(Resource, Clone, Debug, Default, Reflect)]
pub struct ShiftClock {
    remaining: f32,
}

impl ShiftClock {
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

/// Flip between `Playing` and `Paused`. Ignored in any other state.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct TogglePause;

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_state::<SessionState>()
            .add_event::<KitchenEvent>()
            .add_event::<TogglePause>()
            .register_type::<SessionSettings>()
            .register_type::<ShiftClock>()
            .init_resource::<SessionSettings>()
            .init_resource::<ShiftClock>()
            .add_systems(OnExit(SessionState::WaitingToStart), open_session)
            .add_systems(OnEnter(SessionState::GameOver), close_session)
            .add_systems(
                Update,
                (
                    toggle_pause,
                    tick_shift_clock.run_if(in_state(SessionState::Playing)),
                )
                    .before(CounterSet),
            );
    }
}

fn open_session(
    settings: Res<SessionSettings>,
    mut clock: ResMut<ShiftClock>,
    mut objects: ResMut<KitchenObjects>,
    mut counters: Query<&mut Counter>,
    mut kitchen_events: ResMut<Events<KitchenEvent>>,
) {
    info!(shift_length = settings.shift_length, "Shift started");
    clock.remaining = settings.shift_length;
    objects.clear();
    for mut counter in &mut counters {
        counter.reset();
    }
    kitchen_events.clear();
}

fn close_session(mut kitchen_events: ResMut<Events<KitchenEvent>>) {
    info!("Shift over");
    kitchen_events.clear();
}

fn tick_shift_clock(
    time: Res<Time>,
    mut clock: ResMut<ShiftClock>,
    mut next_state: ResMut<NextState<SessionState>>,
) {
    if clock.remaining <= 0. {
        return;
    }
    clock.remaining = (clock.remaining - time.delta_seconds()).max(0.);
    if clock.remaining == 0. {
        next_state.set(SessionState::GameOver);
    }
}

fn toggle_pause(
    mut toggles: EventReader<TogglePause>,
    state: Res<State<SessionState>>,
    mut next_state: ResMut<NextState<SessionState>>,
) {
    // Several toggles in one frame cancel out pairwise.
    if toggles.read().count() % 2 == 0 {
        return;
    }
    match state.get() {
        SessionState::Playing => next_state.set(SessionState::Paused),
        SessionState::Paused => next_state.set(SessionState::Playing),
        other => debug!(state = ?other, "Pause toggled outside of a shift"),
    }
}
