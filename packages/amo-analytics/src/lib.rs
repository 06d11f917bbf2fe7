//! Per-AIP file statistics computed in one pass over indexed file documents.

pub mod aggregate;
pub mod assemble;
pub mod extract;
pub mod formats;
pub mod node;
pub mod stats;
pub mod time_serde;
pub mod timestamp;
pub mod topk;

pub use aggregate::StatsAccumulator;
pub use extract::{FileRecord, FormatIdentity, ObjectMetadata, ProvenanceEvent};
pub use stats::{ArtifactStats, FileSample, FormatVersionCount, KeyCount};
pub use topk::BoundedTopK;
