//! Caustica configuration record and validation.
//!
//! A [`LensConfig`] is a closed record of every knob the generation engine
//! recognizes. Configs can be built in code via [`LensConfig::builder`] or
//! ingested from JSON via [`LensConfig::from_json_str`]; the JSON surface
//! rejects unknown fields.
//!
//! # Example
//!
//! ```
//! use caustica_spec::{validate_config, LensConfig};
//!
//! let config = LensConfig::builder()
//!     .iterations(8)
//!     .refractive_index(1.52)
//!     .build();
//!
//! assert!(validate_config(&config).is_ok());
//! ```

pub mod config;
pub mod error;
pub mod validation;

// Re-export commonly used types at the crate root
pub use config::{LensConfig, LensConfigBuilder, DEFAULT_LENS_WIDTH_METERS};
pub use error::ConfigError;
pub use validation::validate_config;
