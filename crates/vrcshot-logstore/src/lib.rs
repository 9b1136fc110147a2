// Append-only raw log line ledger
// The durable source of truth; the SQLite index is derived from it

mod error;
mod partition;
mod store;

pub use error::{Error, Result};
pub use partition::{MonthKey, PartitionFile};
pub use store::{AppendOutcome, ImportOutcome, LineCursor, LogStore, RawLogLine};
