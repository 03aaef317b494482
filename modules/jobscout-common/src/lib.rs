pub mod config;
pub mod error;
pub mod text;
pub mod types;

pub use config::Config;
pub use error::JobScoutError;
pub use text::truncate_chars;
pub use types::*;
