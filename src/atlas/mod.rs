//! The join pipeline: normalize names, exact join, fuzzy reconciliation,
//! category labelling, and the enriched collection built from them.

mod atlas;
mod category;
mod io;
mod join;
mod normalize;
mod reconcile;
mod record;
mod similarity;
mod summary;

pub use atlas::{Atlas, AtlasSource, MatchStats};
pub use category::{Category, NEUTRAL_COLOR, cluster_color};
pub use normalize::normalize_name;
pub use record::{BoundaryRecord, ClusterMatch, ClusterRecord, EnrichedRecord, Indicators, MatchKind};
pub use similarity::{Similarity, gestalt_ratio};
pub use summary::{ProvinceSummary, format_thousands};
