//! Series data: source normalization and the startup-built hierarchical index.

pub mod builder;
pub mod error;
pub mod index;
pub mod metric;
pub mod normalize;

pub use builder::{build_index, build_index_from_readers, IndexBuilder, SourceSpec};
pub use error::BuildError;
pub use index::{
    CountryNode, DateNode, DuplicatePolicy, IndexStats, RegionNode, ResultTree, SeriesIndex,
    ALL_REGIONS,
};
pub use metric::Metric;
pub use normalize::Observation;
