use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use crate::{atlas::Atlas, io};

impl Atlas {
    /// FeatureCollection of one province (or all records) with the
    /// properties a map tooltip needs.
    pub fn to_geojson_bytes(&self, province: Option<&str>) -> Result<Vec<u8>> {
        let features = self.select(province).into_iter().map(|r| {
            let properties = json!({
                "province": r.province(),
                "district": r.boundary.district,
                "cluster": r.cluster(),
                "category": r.category_label(),
                "ikp": r.ikp(),
                "match": r.matched.as_ref().map(|m| m.kind.as_str()),
                "score": r.matched.as_ref().map(|m| m.kind.score()),
            });
            (&r.boundary.geometry, properties)
        });

        io::geojson::write_features(features)
    }

    pub fn to_geojson(&self, path: &Path, province: Option<&str>) -> Result<()> {
        let bytes = self.to_geojson_bytes(province)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("[to_geojson] Failed to write {}", path.display()))
    }
}
