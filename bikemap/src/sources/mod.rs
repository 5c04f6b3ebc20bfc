//! Map feature sources and their aggregation
//!
//! The map overlays two independent geodata sources: the hand-curated
//! My Maps document (classified on load) and a pre-converted OSM extract
//! (used as-is). The sources load concurrently and fail independently; a
//! failed source is logged and exposed as an empty collection, never as
//! null, so one broken source never blocks the other.

use std::path::PathBuf;

use anyhow::{Context, Result};
use futures::join;
use geojson::{FeatureCollection, GeoJson};
use reqwest::Url;
use tracing::{error, info};

use mymaps::{classify_collection, ClassifiedCollection};

/// Converts a fetched document into a GeoJSON feature collection.
///
/// The KML→GeoJSON and OSM→GeoJSON converters are upstream collaborators;
/// a source only needs their output. [`geojson_passthrough`] covers
/// endpoints and extracts that already serve GeoJSON.
pub type Converter = fn(&str) -> Result<FeatureCollection>;

/// Parses a document that is already GeoJSON
pub fn geojson_passthrough(raw: &str) -> Result<FeatureCollection> {
    let geojson: GeoJson = raw.parse().context("invalid GeoJSON document")?;
    FeatureCollection::try_from(geojson).context("document is not a feature collection")
}

/// A fetchable geodata source
pub trait FeatureSource {
    fn fetch(
        &self,
    ) -> impl std::future::Future<Output = Result<FeatureCollection>> + Send;
}

/// Source fetched over HTTP (the My Maps document)
pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
    convert: Converter,
}

impl HttpSource {
    pub fn new(url: Url) -> Self {
        Self::with_converter(url, geojson_passthrough)
    }

    pub fn with_converter(url: Url, convert: Converter) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            convert,
        }
    }
}

impl FeatureSource for HttpSource {
    async fn fetch(&self) -> Result<FeatureCollection> {
        let body = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("fetching {}", self.url))?
            .error_for_status()
            .with_context(|| format!("fetching {}", self.url))?
            .text()
            .await?;
        (self.convert)(&body)
    }
}

/// Source read from a local file (the OSM extract)
pub struct FileSource {
    path: PathBuf,
    convert: Converter,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self::with_converter(path, geojson_passthrough)
    }

    pub fn with_converter(path: PathBuf, convert: Converter) -> Self {
        Self { path, convert }
    }
}

impl FeatureSource for FileSource {
    async fn fetch(&self) -> Result<FeatureCollection> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        (self.convert)(&raw)
    }
}

/// Ready-to-render feature collections, one per source.
///
/// Both collections are empty until their source resolves, and stay empty
/// when it fails. Renderers never see a null.
#[derive(Debug, Clone)]
pub struct MapFeatures {
    /// Classified My Maps features
    pub my_maps: ClassifiedCollection,

    /// OSM extract, not classified by this core
    pub osm: FeatureCollection,
}

impl Default for MapFeatures {
    fn default() -> Self {
        Self {
            my_maps: ClassifiedCollection::default(),
            osm: empty_collection(),
        }
    }
}

fn empty_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: Vec::new(),
        foreign_members: None,
    }
}

/// Loads and classifies the map sources
pub struct MapFeatureAggregator<M, O> {
    my_maps: M,
    osm: O,
}

impl<M: FeatureSource, O: FeatureSource> MapFeatureAggregator<M, O> {
    pub fn new(my_maps: M, osm: O) -> Self {
        Self { my_maps, osm }
    }

    /// Fetches both sources concurrently. They resolve in either order
    /// and fail independently; failures (including classification
    /// failures of the My Maps batch) are logged and leave the affected
    /// collection empty.
    pub async fn load(&self) -> MapFeatures {
        let (my_maps, osm) = join!(self.load_my_maps(), self.load_osm());
        MapFeatures { my_maps, osm }
    }

    async fn load_my_maps(&self) -> ClassifiedCollection {
        let result = self
            .my_maps
            .fetch()
            .await
            .and_then(|collection| classify_collection(collection).map_err(Into::into));

        match result {
            Ok(classified) => {
                info!(features = classified.len(), "My Maps features loaded");
                classified
            }
            Err(err) => {
                error!("Failed to load My Maps features: {err:#}");
                ClassifiedCollection::default()
            }
        }
    }

    async fn load_osm(&self) -> FeatureCollection {
        match self.osm.fetch().await {
            Ok(collection) => {
                info!(features = collection.features.len(), "OSM features loaded");
                collection
            }
            Err(err) => {
                error!("Failed to load OSM features: {err:#}");
                empty_collection()
            }
        }
    }
}
