use humansize::{format_size, BINARY};
use photomirror_core::ItemStatus;
use std::time::Duration;

/// Files and bytes moved (or that would move, under dry run) during one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferTally {
    pub files: u64,
    pub bytes: u64,
}

impl TransferTally {
    pub fn record(&mut self, bytes: u64) {
        self.files += 1;
        self.bytes += bytes;
    }

    pub fn magnitude(&self) -> String {
        format_size(self.bytes, BINARY)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemCounts {
    pub unchanged: u64,
    pub new: u64,
    pub changed: u64,
}

impl ItemCounts {
    pub fn record(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::Unchanged => self.unchanged += 1,
            ItemStatus::New => self.new += 1,
            ItemStatus::Changed => self.changed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.unchanged + self.new + self.changed
    }
}

pub fn format_summary(tally: &TransferTally, elapsed: Duration, dry_run: bool) -> String {
    let verb = if dry_run { "Would download" } else { "Downloaded" };
    format!(
        "{} {} files ({}) in {:.1?}",
        verb,
        tally.files,
        tally.magnitude(),
        elapsed
    )
}
