#![forbid(unsafe_code)]

mod snapshot;
mod store;

pub use snapshot::{Snapshot, SnapshotStore, StoreDef, stores};
pub use store::*;
