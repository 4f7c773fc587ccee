pub mod config;
pub mod http;
pub mod memory;

pub use config::{BackendConfig, Config, WizardConfig};
pub use http::HttpBackend;
pub use memory::MemoryBackend;
