pub mod error;
pub mod event;
pub mod ids;
pub mod records;
mod time;

pub use error::{Error, Result};
pub use event::*;
pub use ids::*;
pub use records::*;
pub use time::*;
