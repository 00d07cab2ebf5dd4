use std::{collections::HashMap, fs, path::{Path, PathBuf}, sync::Arc, time::SystemTime};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{atlas::{Atlas, AtlasSource}, common, config::AtlasConfig};

/// Length and modification time of one input file.
#[derive(Debug, Clone, PartialEq)]
struct Stamp {
    len: u64,
    modified: Option<SystemTime>,
}

struct Entry {
    stamps: Vec<Stamp>,
    config: AtlasConfig,
    fingerprint: String,
    atlas: Arc<Atlas>,
}

/// Built atlases keyed by their (boundaries, clusters) paths.
///
/// An entry is reused only while the fingerprint of both files (and of a
/// shapefile's `.dbf` sidecar) and of the configuration is unchanged;
/// otherwise the atlas is rebuilt and replaces the entry. Files are hashed
/// only when their length or modification time moved, so a same-length
/// rewrite within the filesystem's timestamp resolution goes unseen until
/// `invalidate`.
#[derive(Default)]
pub struct AtlasCache {
    entries: HashMap<(PathBuf, PathBuf), Entry>,
}

impl AtlasCache {
    pub fn new() -> Self { Self::default() }

    /// The atlas for `source`, building it on first use or after any input changed.
    pub fn get(&mut self, source: &AtlasSource) -> Result<Arc<Atlas>> {
        let key = key_of(source);
        let stamps = input_files(source).iter()
            .map(|path| stamp(path))
            .collect::<Result<Vec<_>>>()?;

        let fingerprint = match self.entries.get_mut(&key) {
            Some(entry) if entry.stamps == stamps && entry.config == source.config => {
                debug!(boundaries = %key.0.display(), clusters = %key.1.display(), "[cache] hit");
                return Ok(Arc::clone(&entry.atlas));
            }
            Some(entry) => {
                let fingerprint = fingerprint(source)?;
                if entry.fingerprint == fingerprint {
                    debug!(boundaries = %key.0.display(), clusters = %key.1.display(), "[cache] hit after rehash");
                    entry.stamps = stamps;
                    entry.config = source.config.clone();
                    return Ok(Arc::clone(&entry.atlas));
                }
                info!(boundaries = %key.0.display(), clusters = %key.1.display(), "[cache] inputs changed, rebuilding");
                fingerprint
            }
            None => fingerprint(source)?,
        };

        let atlas = Arc::new(Atlas::load(source)?);
        let entry = Entry { stamps, config: source.config.clone(), fingerprint, atlas: Arc::clone(&atlas) };
        self.entries.insert(key, entry);
        Ok(atlas)
    }

    /// Drop the entry for `source`; returns whether one existed.
    pub fn invalidate(&mut self, source: &AtlasSource) -> bool {
        self.entries.remove(&key_of(source)).is_some()
    }

    pub fn clear(&mut self) { self.entries.clear() }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

fn key_of(source: &AtlasSource) -> (PathBuf, PathBuf) {
    (source.boundaries.clone(), source.clusters.clone())
}

/// Every file the atlas is read from, in a fixed order.
fn input_files(source: &AtlasSource) -> Vec<PathBuf> {
    let mut files = vec![source.boundaries.clone()];

    // Shapefile attributes live in the sidecar.
    if common::extension_of(&source.boundaries) == "shp" {
        let dbf = source.boundaries.with_extension("dbf");
        if dbf.is_file() { files.push(dbf) }
    }

    files.push(source.clusters.clone());
    files
}

fn stamp(path: &Path) -> Result<Stamp> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("[cache] Failed to stat {}", path.display()))?;
    Ok(Stamp { len: metadata.len(), modified: metadata.modified().ok() })
}

fn fingerprint(source: &AtlasSource) -> Result<String> {
    let mut fp = common::Fingerprint::new();
    for path in input_files(source) {
        fp.update_file(&path)?;
    }
    fp.update(&source.config.to_json_bytes()?);
    Ok(fp.finish())
}
