mod snapshot_store;

pub use snapshot_store::{
    BootstrapOutcome, SaveOutcome, SnapshotStore, StorePaths, COMPACT_STORE, READABLE_STORE,
};
