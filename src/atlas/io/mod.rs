mod geojson;
mod read;
mod svg;
mod table;

pub(crate) use read::{read_boundaries, read_clusters};
