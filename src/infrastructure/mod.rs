pub mod config;
pub mod remote;

pub use config::{ConfigurationStore, ConfigurationTarget, Inspection, SettingsStore};
pub use remote::{HttpClient, HttpFetch};
