//! Hierarchical configuration.
//!
//! # Configuration Precedence
//!
//! Sources are merged from lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. User config (`<data_dir>/config.yaml`)
//! 3. Project config (nearest `haven.yaml` at or above the working directory)
//! 4. Environment variables (`HAVEN_*`)
//! 5. Programmatic overrides (via [`ConfigBuilder::with_config`])
//!
//! # Examples
//!
//! ```
//! use haven::config::{BookingConfig, Config, ConfigBuilder};
//!
//! let custom = Config {
//!     booking: Some(BookingConfig {
//!         max_guests: Some(4),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(custom)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_guests(), Some(4));
//! assert_eq!(config.currency(), "EUR");
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, PROJECT_CONFIG_FILE, USER_CONFIG_FILE};
pub use merger::ConfigMerger;
pub use schema::{BookingConfig, Config, PricingConfig, DEFAULT_CURRENCY};
pub use validator::ConfigValidator;
