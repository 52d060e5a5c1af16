pub mod settings;

pub use settings::{AppConfig, DatabaseConfig, HealthConfig, ServerConfig};
