use std::collections::VecDeque;

use bevy::{
    app::{App, AppExit, Plugin, Update},
    core::Name,
    ecs::{
        entity::Entity,
        event::EventWriter,
        query::With,
        schedule::{common_conditions::in_state, Condition, IntoSystemConfigs, OnEnter, State},
        system::{Query, Res, ResMut, Resource},
    },
    time::{Time, Timer, TimerMode},
};
use kitchen_core::{
    chef::{Chef, InteractEvent},
    counter::{Counter, CounterSet},
    session::{SessionState, ShiftClock, TogglePause},
};
use tracing::{debug, info, warn};

use crate::presentation::ShiftStats;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptAction {
    /// The chef uses the counter with this name.
    Use(&'static str),
    TogglePause,
}

/// Seconds to wait after the previous step, then what to do.
pub const DEMO_SHIFT: &[(f32, ScriptAction)] = &[
    (1.0, ScriptAction::Use("Patty crate")),
    (0.5, ScriptAction::Use("Stove")),
    (3.5, ScriptAction::Use("Plate rack")),
    (2.0, ScriptAction::Use("Stove")),
    (0.5, ScriptAction::Use("Work top")),
    (0.5, ScriptAction::Use("Bread crate")),
    (0.5, ScriptAction::Use("Work top")),
    (0.5, ScriptAction::Use("Tomato crate")),
    (0.5, ScriptAction::Use("Work top")),
    (0.5, ScriptAction::Use("Work top")),
    (0.5, ScriptAction::Use("Trash")),
    (1.0, ScriptAction::TogglePause),
    (2.0, ScriptAction::TogglePause),
    (1.0, ScriptAction::Use("Patty crate")),
    (0.5, ScriptAction::Use("Stove")),
    (14.0, ScriptAction::Use("Stove")),
    (0.5, ScriptAction::Use("Trash")),
];

/// Stands in for player input: replays a fixed list of interactions.
#[derive(Resource, Debug)]
pub struct ShiftScript {
    steps: VecDeque<(f32, ScriptAction)>,
    wait: Option<Timer>,
}

impl ShiftScript {
    pub fn new(steps: &[(f32, ScriptAction)]) -> Self {
        Self {
            steps: steps.iter().copied().collect(),
            wait: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for ShiftScript {
    fn default() -> Self {
        Self::new(DEMO_SHIFT)
    }
}

pub struct ShiftPlugin;

impl Plugin for ShiftPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ShiftScript>()
            .add_systems(
                Update,
                run_script
                    .run_if(in_state(SessionState::Playing).or_else(in_state(SessionState::Paused)))
                    .before(CounterSet),
            )
            .add_systems(OnEnter(SessionState::GameOver), end_shift);
    }
}

fn run_script(
    time: Res<Time>,
    session: Res<State<SessionState>>,
    mut script: ResMut<ShiftScript>,
    chefs: Query<Entity, With<Chef>>,
    counters: Query<(Entity, &Name), With<Counter>>,
    mut interactions: EventWriter<InteractEvent>,
    mut pauses: EventWriter<TogglePause>,
) {
    let script = &mut *script;
    let Some(&(delay, action)) = script.steps.front() else {
        return;
    };
    let wait = script
        .wait
        .get_or_insert_with(|| Timer::from_seconds(delay, TimerMode::Once));
    if !wait.tick(time.delta()).finished() {
        return;
    }

    match action {
        ScriptAction::Use(_) if *session.get() == SessionState::Paused => {
            debug!("Holding scripted interaction while paused");
            return;
        }
        ScriptAction::Use(name) => {
            let Ok(chef) = chefs.get_single() else {
                warn!("Scripted shift needs exactly one chef");
                return;
            };
            match counters.iter().find(|(_, counter_name)| counter_name.as_str() == name) {
                Some((counter, _)) => {
                    debug!(counter = name, "Chef uses counter");
                    interactions.send(InteractEvent { chef, counter });
                }
                None => warn!(counter = name, "Scripted counter is not in the kitchen"),
            }
        }
        ScriptAction::TogglePause => pauses.send(TogglePause),
    }

    script.steps.pop_front();
    script.wait = None;
}

fn end_shift(stats: Res<ShiftStats>, clock: Res<ShiftClock>, mut exit: EventWriter<AppExit>) {
    info!(
        grabbed = stats.grabbed,
        plates_taken = stats.plates_taken,
        plated = stats.plated,
        trashed = stats.trashed,
        burned = stats.burned,
        remaining = clock.remaining(),
        "Shift summary"
    );
    exit.send(AppExit);
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use bevy::ecs::schedule::NextState;
    use kitchen_core::{
        item::Items, layout::CounterSpec, recipe::CookingRecipes, KitchenCorePlugins,
    };

    use super::*;
    use crate::{catalog_loader::CatalogAsset, presentation::PresentationPlugin};

    fn demo_kitchen() -> App {
        let catalog: CatalogAsset =
            ron::from_str(include_str!("../assets/data/kitchen.catalog.ron")).unwrap();
        let layout: Vec<CounterSpec> =
            ron::from_str(include_str!("../assets/data/kitchen.layout.ron")).unwrap();

        let mut app = App::new();
        app.add_plugins((KitchenCorePlugins, PresentationPlugin, ShiftPlugin))
            .init_resource::<Time>()
            .insert_resource(Items::from_definitions(catalog.items))
            .insert_resource(CookingRecipes::new(catalog.frying, catalog.burning));
        for spec in &layout {
            app.world
                .spawn((Name::new(spec.name.clone()), Counter::from(&spec.kind)));
        }
        app.world.spawn((Name::new("Chef"), Chef));
        app.world
            .resource_mut::<NextState<SessionState>>()
            .set(SessionState::Playing);
        app.update();
        app
    }

    fn run_for(app: &mut App, seconds: u64) {
        for _ in 0..seconds * 10 {
            app.world
                .resource_mut::<Time>()
                .advance_by(Duration::from_millis(100));
            app.update();
        }
    }

    #[test]
    fn scripted_burger_is_assembled_then_trashed() {
        let mut app = demo_kitchen();
        run_for(&mut app, 12);

        let stats = app.world.resource::<ShiftStats>();
        assert_eq!(stats.grabbed, 3);
        assert_eq!(stats.plates_taken, 1);
        assert_eq!(stats.plated, 3);
        assert_eq!(stats.trashed, 1);
        assert_eq!(stats.burned, 0);
    }

    #[test]
    fn forgotten_patty_burns() {
        let mut app = demo_kitchen();
        run_for(&mut app, 34);

        let stats = app.world.resource::<ShiftStats>();
        assert_eq!(stats.burned, 1);
        assert_eq!(stats.trashed, 2);
        assert!(app.world.resource::<ShiftScript>().is_finished());
    }

    #[test]
    fn script_waits_between_steps() {
        let mut app = App::new();
        app.add_plugins(KitchenCorePlugins)
            .init_resource::<Time>()
            .insert_resource(ShiftScript::new(&[(1.0, ScriptAction::TogglePause)]))
            .add_systems(Update, run_script);
        app.world
            .resource_mut::<NextState<SessionState>>()
            .set(SessionState::Playing);
        app.update();

        app.world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(500));
        app.update();
        assert!(!app.world.resource::<ShiftScript>().is_finished());

        app.update();
        assert!(app.world.resource::<ShiftScript>().is_finished());
    }
}
