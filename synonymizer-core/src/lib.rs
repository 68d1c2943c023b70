pub mod config;
pub mod error;
pub mod error_utils;
pub mod http;
pub mod retry;
#[cfg(feature = "test-util")]
pub mod testing;
pub mod types;

pub use config::*;
pub use error::*;
pub use error_utils::*;
pub use http::OllamaHttp;
pub use retry::*;
pub use types::*;
