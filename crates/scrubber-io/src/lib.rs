pub mod archive;
pub mod directory;
pub mod error;
pub mod export;
pub mod table;
pub mod upload;
pub mod webdav;

pub use error::{IoError, Result};
