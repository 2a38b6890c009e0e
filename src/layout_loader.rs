use bevy::{
    app::{App, Plugin},
    asset::{io::Reader, Asset, AssetApp, AssetLoader, AsyncReadExt, LoadContext},
    reflect::TypePath,
    utils::BoxedFuture,
};
use kitchen_core::layout::CounterSpec;
use serde::Deserialize;
use tracing::{debug, info_span};

#[derive(Default)]
pub struct LayoutAssetLoader;

/// The counters of one kitchen, in the order they are spawned.
#[derive(Asset, TypePath, Clone, Debug, Deserialize)]
pub struct LayoutAsset(pub Vec<CounterSpec>);

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LayoutAssetLoaderError {
    /// An [IO](std::io) Error.
    #[error("Could not load asset: {0}")]
    Io(#[from] std::io::Error),
    /// A [Ron](ron) Error.
    #[error("Could not parse RON: {0}")]
    RonSpannedError(#[from] ron::error::SpannedError),
}

impl AssetLoader for LayoutAssetLoader {
    type Asset = LayoutAsset;
    type Settings = ();
    type Error = LayoutAssetLoaderError;
    fn load<'a>(
        &'a self,
        reader: &'a mut Reader,
        _settings: &'a Self::Settings,
        load_context: &'a mut LoadContext,
    ) -> BoxedFuture<'a, Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let path = load_context.path().display().to_string();
            let span = info_span!("Loading layout asset", path = %path);
            let _enter = span.enter();
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).await?;
            let counters: Vec<CounterSpec> = ron::de::from_bytes(&buf)?;
            debug!(counters = counters.len(), "Finished loading");
            Ok(LayoutAsset(counters))
        })
    }

    fn extensions(&self) -> &[&str] {
        &["layout.ron"]
    }
}

pub struct LayoutLoaderPlugin;

impl Plugin for LayoutLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<LayoutAsset>()
            .init_asset_loader::<LayoutAssetLoader>();
    }
}

#[cfg(test)]
mod test {
    use kitchen_core::layout::CounterKind;

    use super::*;

    #[test]
    fn shipped_layout_parses() {
        let counters: Vec<CounterSpec> =
            ron::from_str(include_str!("../assets/data/kitchen.layout.ron")).unwrap();
        assert!(counters
            .iter()
            .any(|counter| counter.kind == CounterKind::Stove));
        assert!(counters
            .iter()
            .any(|counter| matches!(counter.kind, CounterKind::Plates { .. })));
    }
}
