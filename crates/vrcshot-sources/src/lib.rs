pub mod error;
pub mod logs;
pub mod photos;

pub use error::{Error, Result};
