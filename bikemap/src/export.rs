//! Grouped GeoJSON export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geojson::FeatureCollection;
use tracing::info;

use mymaps::{ClassifiedCollection, FeatureGroup};

/// Writes one GeoJSON file per populated feature group into `output`.
///
/// Returns the per-group feature counts, sorted by group name for stable
/// summaries.
pub fn export_grouped(
    classified: &ClassifiedCollection,
    output: &Path,
) -> Result<Vec<(FeatureGroup, usize)>> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("creating {}", output.display()))?;

    let mut summary: Vec<(FeatureGroup, usize)> = Vec::new();

    for (group, collection) in classified.by_group() {
        let path = output.join(format!("{}.geojson", file_stem(group)));
        write_collection(&collection, &path)?;
        info!(
            group = group.as_str(),
            features = collection.features.len(),
            "Exported feature group"
        );
        summary.push((group, collection.features.len()));
    }

    summary.sort_by_key(|(group, _)| group.as_str());
    Ok(summary)
}

/// Writes a single feature collection, returning its feature count
pub fn export_collection(collection: &FeatureCollection, path: &Path) -> Result<usize> {
    write_collection(collection, path)?;
    Ok(collection.features.len())
}

fn write_collection(collection: &FeatureCollection, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, collection)
        .with_context(|| format!("writing {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// File name for a group ("ofney dan" keeps a space in its display name)
fn file_stem(group: FeatureGroup) -> String {
    group.as_str().replace(' ', "-")
}
