//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge `~/.warden/config.toml` (user)
//! 3. Merge the explicit config file, if one was given
//! 4. Apply `WARDEN_*` environment overrides
//! 5. Deserialize merged tree → `Config`
//! 6. Validate

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use warden_core::SecurityTier;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Environment variables recognized as overrides, with the field each sets.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("WARDEN_AUDIT_BUFFER_SIZE", "audit.buffer_size"),
    ("WARDEN_FALLBACK_TIER", "permissions.fallback_tier"),
    ("WARDEN_LOG_LEVEL", "logging.level"),
];

/// Load configuration with layered file precedence.
///
/// `explicit` is a file named by the caller (e.g. a `--config` flag); unlike
/// the user file it must exist. `home_override` replaces the discovered home
/// directory, which is where `.warden/config.toml` is looked up.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is unreadable or malformed,
/// an override variable is invalid, or the merged configuration fails
/// validation.
pub fn load(explicit: Option<&Path>, home_override: Option<&Path>) -> ConfigResult<Config> {
    load_with_env(explicit, home_override, &collect_env_vars())
}

/// [`load`] with the environment supplied by the caller.
///
/// # Errors
///
/// Same as [`load`].
pub fn load_with_env<S: ::std::hash::BuildHasher>(
    explicit: Option<&Path>,
    home_override: Option<&Path>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<Config> {
    // 1. Embedded defaults.
    let mut merged = parse_toml(DEFAULTS_TOML, "<embedded defaults>")?;

    // 2. User config.
    let home_dir = match home_override {
        Some(h) => h.to_path_buf(),
        None => home_directory()?,
    };
    let user_path = home_dir.join(".warden").join("config.toml");
    if let Some(overlay) = try_load_file(&user_path)? {
        deep_merge(&mut merged, &overlay);
        info!(path = %user_path.display(), "loaded user config");
    }

    // 3. Explicit config.
    if let Some(path) = explicit {
        let overlay = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })?;
        deep_merge(&mut merged, &overlay);
        info!(path = %path.display(), "loaded explicit config");
    }

    // 4. Environment overrides.
    let applied = apply_env_overrides(&mut merged, env_vars)?;
    if applied > 0 {
        debug!(count = applied, "applied environment overrides");
    }

    // 5–6. Deserialize and validate.
    let config: Config = merged
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: "<merged config>".to_owned(),
            source: e,
        })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Load a config from a specific file path (no layering).
///
/// Missing sections take their default values.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let overlay = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
        path: path.display().to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })?;
    let config: Config = overlay
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Parse a config from a TOML string layered over the defaults.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the string is malformed or fails validation.
pub fn from_toml_str(content: &str) -> ConfigResult<Config> {
    let mut merged = parse_toml(DEFAULTS_TOML, "<embedded defaults>")?;
    deep_merge(&mut merged, &parse_toml(content, "<string>")?);
    let config: Config = merged
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: "<string>".to_owned(),
            source: e,
        })?;
    validate::validate(&config)?;
    Ok(config)
}

fn parse_toml(content: &str, origin: &str) -> ConfigResult<toml::Value> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: origin.to_owned(),
        source: e,
    })
}

/// Try to load a file, returning `None` if the file doesn't exist.
///
/// Uses a single read operation to avoid TOCTOU races.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    let len = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if len > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {len} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit"
            ),
        });
    }

    parse_toml(&content, &path.display().to_string()).map(Some)
}

/// Recursively deep-merge `overlay` into `base`.
///
/// Tables merge per key; scalars and arrays from the overlay replace the
/// base value.
fn deep_merge(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                match base_table.get_mut(key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => {
                        base_table.insert(key.clone(), overlay_val.clone());
                    },
                }
            }
        },
        (base, overlay) => *base = overlay.clone(),
    }
}

fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("WARDEN_"))
        .collect()
}

/// Write recognized `WARDEN_*` values into the merged tree.
///
/// Returns the number of overrides applied.
fn apply_env_overrides<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<usize> {
    let mut count: usize = 0;

    for (var_name, field_path) in ENV_OVERRIDES {
        let Some(raw) = env_vars.get(*var_name) else {
            continue;
        };
        let value = coerce_env_value(var_name, raw.trim())?;
        debug!(var = var_name, field = field_path, "applying env override");
        set_field(merged, field_path, value);
        count = count.saturating_add(1);
    }

    Ok(count)
}

fn coerce_env_value(var_name: &str, raw: &str) -> ConfigResult<toml::Value> {
    match var_name {
        "WARDEN_AUDIT_BUFFER_SIZE" => raw
            .parse::<i64>()
            .map(toml::Value::Integer)
            .map_err(|_| ConfigError::EnvError {
                var_name: var_name.to_owned(),
                message: format!("expected an integer, got '{raw}'"),
            }),
        "WARDEN_FALLBACK_TIER" => raw
            .parse::<SecurityTier>()
            .map(|tier| toml::Value::String(tier.as_str().to_owned()))
            .map_err(|e| ConfigError::EnvError {
                var_name: var_name.to_owned(),
                message: e.to_string(),
            }),
        _ => Ok(toml::Value::String(raw.to_owned())),
    }
}

/// Set a dotted `path` in `root`, creating intermediate tables.
fn set_field(root: &mut toml::Value, path: &str, value: toml::Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut current = root;
    for segment in segments {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        current = table
            .entry(segment.to_owned())
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }

    if let Some(table) = current.as_table_mut() {
        table.insert(leaf.to_owned(), value);
    }
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::RateLimit;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    fn write_user_config(home: &Path, content: &str) {
        let dir = home.join(".warden");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), content).unwrap();
    }

    #[test]
    fn test_defaults_deserialize_to_default_config() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_defaults_only() {
        let home = tempfile::tempdir().unwrap();
        let config = load_with_env(None, Some(home.path()), &no_env()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_user_then_explicit_precedence() {
        let home = tempfile::tempdir().unwrap();
        write_user_config(
            home.path(),
            r#"
            [audit]
            buffer_size = 500

            [rate_limits.execute]
            count = 3
            "#,
        );

        let explicit = home.path().join("explicit.toml");
        std::fs::write(
            &explicit,
            r#"
            [audit]
            buffer_size = 700

            [permissions.tools]
            web_fetch = "execute"
            "#,
        )
        .unwrap();

        let config = load_with_env(Some(&explicit), Some(home.path()), &no_env()).unwrap();
        assert_eq!(config.audit.buffer_size, 700);
        // Deep merge keeps the default window alongside the user's count.
        assert_eq!(config.rate_limits.execute, RateLimit::new(3, 60_000));
        assert_eq!(
            config.permissions.tools.get("web_fetch"),
            Some(&SecurityTier::Execute)
        );
    }

    #[test]
    fn test_env_overrides_files() {
        let home = tempfile::tempdir().unwrap();
        write_user_config(home.path(), "[audit]\nbuffer_size = 500\n");

        let env: HashMap<String, String> = [
            ("WARDEN_AUDIT_BUFFER_SIZE", "42"),
            ("WARDEN_FALLBACK_TIER", "Execute"),
            ("WARDEN_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = load_with_env(None, Some(home.path()), &env).unwrap();
        assert_eq!(config.audit.buffer_size, 42);
        assert_eq!(config.permissions.fallback_tier, SecurityTier::Execute);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_env_values() {
        let home = tempfile::tempdir().unwrap();

        let env: HashMap<String, String> =
            [("WARDEN_AUDIT_BUFFER_SIZE".to_string(), "lots".to_string())].into();
        assert!(matches!(
            load_with_env(None, Some(home.path()), &env),
            Err(ConfigError::EnvError { .. })
        ));

        let env: HashMap<String, String> =
            [("WARDEN_FALLBACK_TIER".to_string(), "root".to_string())].into();
        assert!(matches!(
            load_with_env(None, Some(home.path()), &env),
            Err(ConfigError::EnvError { .. })
        ));

        let env: HashMap<String, String> =
            [("WARDEN_AUDIT_BUFFER_SIZE".to_string(), "0".to_string())].into();
        assert!(matches!(
            load_with_env(None, Some(home.path()), &env),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let home = tempfile::tempdir().unwrap();
        let missing = home.path().join("missing.toml");
        assert!(matches!(
            load_with_env(Some(&missing), Some(home.path()), &no_env()),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn test_unknown_tier_in_file_rejected() {
        let home = tempfile::tempdir().unwrap();
        write_user_config(home.path(), "[permissions]\nfallback_tier = \"root\"\n");
        assert!(matches!(
            load_with_env(None, Some(home.path()), &no_env()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let home = tempfile::tempdir().unwrap();
        write_user_config(home.path(), "[audit\nbuffer_size = ");
        assert!(matches!(
            load_with_env(None, Some(home.path()), &no_env()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_load_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warden.toml");
        std::fs::write(&path, "[maintenance]\nenabled = true\n").unwrap();

        let config = load_file(&path).unwrap();
        assert!(config.maintenance.enabled);
        assert_eq!(config.maintenance.cleanup_interval_secs, 300);
        assert_eq!(config.audit.buffer_size, 10_000);
    }

    #[test]
    fn test_load_file_nonexistent() {
        let result = load_file(Path::new("/nonexistent/warden.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_from_toml_str() {
        let config = from_toml_str("[logging]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.logging.format, "json");
        assert!(from_toml_str("[logging]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn test_oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        std::fs::write(&file_path, data).unwrap();

        let result = try_load_file(&file_path);
        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "Expected ValidationError for oversized config, got: {result:?}"
        );
    }

    #[test]
    fn test_set_field_creates_tables() {
        let mut root = toml::Value::Table(toml::map::Map::new());
        set_field(&mut root, "a.b.c", toml::Value::Integer(1));
        assert_eq!(root["a"]["b"]["c"].as_integer(), Some(1));
    }
}
