pub mod sync;

// Re-export core engine components
pub use sync::{
    default_engine, CleanupReport, ItemCounts, MirrorEngine, MirrorOptions, MirrorRequest,
    MirrorResult, SyncError, TransferTally,
};

// Re-export scanner types often needed by consumers
pub use photomirror_scanner::ScanStats;
