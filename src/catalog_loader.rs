use bevy::{
    app::{App, Plugin},
    asset::{io::Reader, Asset, AssetApp, AssetLoader, AsyncReadExt, LoadContext},
    reflect::TypePath,
    utils::BoxedFuture,
};
use kitchen_core::{item::ItemDefinition, recipe::CookingRecipe};
use serde::Deserialize;
use tracing::{debug, info_span};

#[derive(Default)]
pub struct CatalogAssetLoader;

/// Every item the kitchen knows about plus the stove's recipe tables.
#[derive(Asset, TypePath, Clone, Debug, Deserialize)]
pub struct CatalogAsset {
    pub items: Vec<ItemDefinition>,
    #[serde(default)]
    pub frying: Vec<CookingRecipe>,
    #[serde(default)]
    pub burning: Vec<CookingRecipe>,
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CatalogAssetLoaderError {
    /// An [IO](std::io) Error.
    #[error("Could not load asset: {0}")]
    Io(#[from] std::io::Error),
    /// A [Ron](ron) Error.
    #[error("Could not parse RON: {0}")]
    RonSpannedError(#[from] ron::error::SpannedError),
}

impl AssetLoader for CatalogAssetLoader {
    type Asset = CatalogAsset;
    type Settings = ();
    type Error = CatalogAssetLoaderError;
    fn load<'a>(
        &'a self,
        reader: &'a mut Reader,
        _settings: &'a Self::Settings,
        load_context: &'a mut LoadContext,
    ) -> BoxedFuture<'a, Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let path = load_context.path().display().to_string();
            let span = info_span!("Loading catalog asset", path = %path);
            let _enter = span.enter();
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).await?;
            let catalog: CatalogAsset = ron::de::from_bytes(&buf)?;
            debug!(
                items = catalog.items.len(),
                frying = catalog.frying.len(),
                burning = catalog.burning.len(),
                "Finished loading"
            );
            Ok(catalog)
        })
    }

    fn extensions(&self) -> &[&str] {
        &["catalog.ron"]
    }
}

pub struct CatalogLoaderPlugin;

impl Plugin for CatalogLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<CatalogAsset>()
            .init_asset_loader::<CatalogAssetLoader>();
    }
}
