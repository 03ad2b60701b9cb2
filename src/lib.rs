// ABOUTME: Public library API for diary-sync
// ABOUTME: Re-exports core modules for external use

pub mod api;
pub mod cli;
pub mod config;
pub mod convert;
pub mod entry;
pub mod error;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod storage;
pub mod util;

pub use error::{Error, Result};
pub use model::{Block, BlockKind, Page, Paginated, RichText};
