pub mod client;
pub mod cluster;
pub mod cursor;
pub mod query;
pub mod transfer;

mod error;

pub use client::{SearchClient, SearchHit, SearchResponse};
pub use cluster::ServiceStats;
pub use error::{Error, Result};
pub use transfer::{TransferHit, TransferLookup};
