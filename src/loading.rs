use anyhow::{bail, Context};
use bevy::{
    app::{App, AppExit, Plugin, Update},
    asset::{AssetServer, Assets, Handle, LoadState},
    ecs::{
        event::EventWriter,
        schedule::{common_conditions::in_state, IntoSystemConfigs, NextState, OnEnter},
        system::{Commands, Res, ResMut, Resource},
    },
    utils::HashSet,
};
use kitchen_core::{
    item::{Item, Items},
    layout::CounterSpec,
    recipe::{CookingRecipe, CookingRecipes},
    types::AppState,
};
use tracing::{error, info};

use crate::{catalog_loader::CatalogAsset, layout_loader::LayoutAsset};

#[derive(Resource)]
struct KitchenHandles {
    catalog: Handle<CatalogAsset>,
    layout: Handle<LayoutAsset>,
}

/// The validated counter layout, waiting for the scene to be built from it.
#[derive(Resource, Clone, Debug, Default)]
pub struct KitchenLayout(pub Vec<CounterSpec>);

fn start_loading(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(KitchenHandles {
        catalog: asset_server.load("data/kitchen.catalog.ron"),
        layout: asset_server.load("data/kitchen.layout.ron"),
    });
}

fn check_loading(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    handles: Res<KitchenHandles>,
    catalogs: Res<Assets<CatalogAsset>>,
    layouts: Res<Assets<LayoutAsset>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut exit: EventWriter<AppExit>,
) {
    let failed = [handles.catalog.id().untyped(), handles.layout.id().untyped()]
        .into_iter()
        .any(|id| asset_server.get_load_state(id) == Some(LoadState::Failed));
    if failed {
        error!("Kitchen data failed to load");
        exit.send(AppExit);
        return;
    }

    let (Some(catalog), Some(LayoutAsset(layout))) =
        (catalogs.get(&handles.catalog), layouts.get(&handles.layout))
    else {
        return;
    };

    if let Err(err) = validate_catalog(catalog).and_then(|()| validate_layout(layout, catalog)) {
        error!("Invalid kitchen data: {err:#}");
        exit.send(AppExit);
        return;
    }

    info!(
        items = catalog.items.len(),
        counters = layout.len(),
        "Kitchen data loaded"
    );
    commands.insert_resource(Items::from_definitions(catalog.items.iter().cloned()));
    commands.insert_resource(CookingRecipes::new(
        catalog.frying.clone(),
        catalog.burning.clone(),
    ));
    commands.insert_resource(KitchenLayout(layout.clone()));
    commands.remove_resource::<KitchenHandles>();
    next_state.set(AppState::Running);
}

pub fn validate_catalog(catalog: &CatalogAsset) -> anyhow::Result<()> {
    let mut known = HashSet::default();
    for definition in &catalog.items {
        if !known.insert(&definition.item) {
            bail!("item {} is defined twice", definition.item);
        }
    }

    for definition in &catalog.items {
        if let Some(plate) = &definition.plate {
            for ingredient in &plate.valid_ingredients {
                if !known.contains(ingredient) {
                    bail!(
                        "plate {} accepts unknown item {ingredient}",
                        definition.item
                    );
                }
            }
        }
    }

    validate_recipes("frying", &catalog.frying, &known)?;
    validate_recipes("burning", &catalog.burning, &known)
}

fn validate_recipes(
    table: &str,
    recipes: &[CookingRecipe],
    known: &HashSet<&Item>,
) -> anyhow::Result<()> {
    let mut inputs = HashSet::default();
    for recipe in recipes {
        let check = || -> anyhow::Result<()> {
            if !known.contains(&recipe.input) {
                bail!("unknown input item");
            }
            if !known.contains(&recipe.output) {
                bail!("unknown output item {}", recipe.output);
            }
            if recipe.duration <= 0. || !recipe.duration.is_finite() {
                bail!("duration must be a positive number of seconds");
            }
            Ok(())
        };
        check().with_context(|| format!("{table} recipe for {}", recipe.input))?;
        if !inputs.insert(&recipe.input) {
            bail!("{table} table has two recipes for {}", recipe.input);
        }
    }
    Ok(())
}

pub fn validate_layout(layout: &[CounterSpec], catalog: &CatalogAsset) -> anyhow::Result<()> {
    if layout.is_empty() {
        bail!("kitchen layout has no counters");
    }

    let mut names = HashSet::default();
    for counter in layout {
        if !names.insert(counter.name.as_str()) {
            bail!("two counters are named {}", counter.name);
        }
        validate_counter(counter, catalog).with_context(|| format!("counter {}", counter.name))?;
    }
    Ok(())
}

fn validate_counter(counter: &CounterSpec, catalog: &CatalogAsset) -> anyhow::Result<()> {
    use kitchen_core::layout::CounterKind;

    for item in counter.kind.referenced_items() {
        if !catalog.items.iter().any(|definition| &definition.item == item) {
            bail!("uses unknown item {item}");
        }
    }

    if let CounterKind::Plates {
        plate,
        spawn_interval,
        ..
    } = &counter.kind
    {
        let is_plate = catalog
            .items
            .iter()
            .any(|definition| &definition.item == plate && definition.is_plate());
        if !is_plate {
            bail!("hands out {plate}, which is not a plate");
        }
        if *spawn_interval <= 0. || !spawn_interval.is_finite() {
            bail!("spawn interval must be a positive number of seconds");
        }
    }
    Ok(())
}

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KitchenLayout>()
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(Update, check_loading.run_if(in_state(AppState::Loading)));
    }
}
