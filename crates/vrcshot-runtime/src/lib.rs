pub mod cancel;
pub mod config;
pub mod error;
pub mod query;
pub mod scan;
pub mod sync;
pub mod watch;

pub use cancel::CancelToken;
pub use config::{Config, resolve_workspace_path};
pub use error::{Error, Result};
pub use query::{GroupPage, QueryService, TimeWindow};
pub use scan::{PhotoScanner, ScanOutcome, ScanProgress};
pub use sync::{SyncGate, SyncMode, SyncOutcome, SyncProgress, SyncService};
pub use watch::{ActivityEvent, WorkspaceWatcher};
