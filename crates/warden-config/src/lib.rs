//! Layered configuration for the Warden control plane.
//!
//! # Usage
//!
//! ```rust,no_run
//! use warden_config::Config;
//!
//! // defaults → ~/.warden/config.toml → ./warden.toml → WARDEN_* env
//! let config = Config::load(Some(std::path::Path::new("warden.toml"))).unwrap();
//! println!("audit buffer: {}", config.audit.buffer_size);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Environment variables** (`WARDEN_AUDIT_BUFFER_SIZE`,
//!    `WARDEN_FALLBACK_TIER`, `WARDEN_LOG_LEVEL`)
//! 2. **Explicit file** passed by the caller
//! 3. **User** (`~/.warden/config.toml`)
//! 4. **Embedded defaults** (`defaults.toml` compiled into binary)
//!
//! Tables merge key by key; scalars and arrays replace.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// See [`loader::load`] for the algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(explicit: Option<&std::path::Path>) -> ConfigResult<Self> {
        loader::load(explicit, None)
    }

    /// Load configuration with an explicit home directory.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_with_home(
        explicit: Option<&std::path::Path>,
        home_dir: &std::path::Path,
    ) -> ConfigResult<Self> {
        loader::load(explicit, Some(home_dir))
    }

    /// Load configuration from a single file (no layering).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }

    /// Parse a TOML string layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the string is malformed or fails
    /// validation.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        loader::from_toml_str(content)
    }
}
