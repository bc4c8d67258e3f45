pub mod changelog;
pub mod cli;
pub mod config;
pub mod error;
pub mod fallback;
pub mod git;
pub mod plan;
pub mod scenario;
pub mod ui;
pub mod version;

pub use error::{GitPlusError, Result};
