mod args;
mod commands;
mod context;
mod handlers;
mod output;

pub use args::{Cli, Commands, GalleryCommand, OutputFormat, StoreCommand, SuggestCommand};
pub use commands::run;
