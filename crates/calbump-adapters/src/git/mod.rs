//! Version-control adapters.

mod cli;

pub use cli::GitCli;
