#![doc = "Pangan public API: food-security atlas of Sumatran districts"]
mod atlas;
mod cache;
mod common;
mod config;
mod io;
mod text;

#[doc(inline)]
pub use atlas::{
    Atlas, AtlasSource, BoundaryRecord, Category, ClusterMatch, ClusterRecord, EnrichedRecord, Indicators,
    MatchKind, MatchStats, NEUTRAL_COLOR, ProvinceSummary, Similarity, cluster_color, format_thousands,
    gestalt_ratio, normalize_name,
};

#[doc(inline)]
pub use cache::AtlasCache;

#[doc(inline)]
pub use config::{AtlasConfig, BoundaryColumns, ClusterColumns, MatchOptions};

pub use text::{GUIDE, INDICATORS, category_legend};
