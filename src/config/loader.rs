//! Configuration loading and source resolution.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{
    LogConfig, Output, PartialLogConfig, DISPLAY_MINIMAL_KEY, FILENAME_KEY, LEVEL_KEY, OUTPUT_KEY,
};
use crate::observability::Level;

/// Error type for configuration file loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Merge configuration sources into the effective configuration.
///
/// Per field the first source that sets it wins, in the order explicit,
/// flags, environment; anything still unset takes the built-in default.
pub fn resolve(
    explicit: Option<&PartialLogConfig>,
    flags: &PartialLogConfig,
    env: &PartialLogConfig,
) -> LogConfig {
    explicit
        .cloned()
        .unwrap_or_default()
        .or(flags.clone())
        .or(env.clone())
        .into_config()
}

/// Read configuration from the process environment.
pub fn from_env() -> PartialLogConfig {
    from_env_with(|key| env::var(key).ok())
}

/// Read configuration through an arbitrary variable lookup.
///
/// Empty values count as unset.
pub fn from_env_with<F>(lookup: F) -> PartialLogConfig
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

    PartialLogConfig {
        output: var(OUTPUT_KEY).map(Output::from),
        level: var(LEVEL_KEY).map(Level::from),
        filename: var(FILENAME_KEY).map(Into::into),
        display_minimal: var(DISPLAY_MINIMAL_KEY).and_then(|value| parse_bool(&value)),
        terminal_output: None,
    }
}

/// Load a configuration file (TOML) for use as the explicit source.
pub fn load_config(path: &Path) -> Result<PartialLogConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: PartialLogConfig = toml::from_str(&content)?;
    Ok(config)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env_of(vars: &[(&str, &str)]) -> PartialLogConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        from_env_with(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_env_level_debug_without_flags() {
        let env = env_of(&[("BIVALVE_LEVEL", "debug")]);
        let config = resolve(None, &PartialLogConfig::default(), &env);
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.level.value(), 4);
    }

    #[test]
    fn test_precedence_explicit_flag_env_default() {
        let explicit = PartialLogConfig {
            level: Some(Level::Error),
            ..Default::default()
        };
        let flags = PartialLogConfig {
            level: Some(Level::Debug),
            output: Some(Output::File),
            ..Default::default()
        };
        let env = env_of(&[
            ("BIVALVE_LEVEL", "info"),
            ("BIVALVE_OUTPUT", "stdout"),
            ("BIVALVE_FILENAME", "/var/log/app.log"),
        ]);

        let config = resolve(Some(&explicit), &flags, &env);
        assert_eq!(config.level, Level::Error);
        assert_eq!(config.output, Output::File);
        assert_eq!(config.filename, PathBuf::from("/var/log/app.log"));
        assert!(!config.display_minimal);
    }

    #[test]
    fn test_unrecognised_values_fall_back() {
        let env = env_of(&[("BIVALVE_LEVEL", "loud"), ("BIVALVE_OUTPUT", "both")]);
        let config = resolve(None, &PartialLogConfig::default(), &env);
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.output, Output::Stderr);
    }

    #[test]
    fn test_empty_env_is_unset() {
        let env = env_of(&[("BIVALVE_OUTPUT", ""), ("BIVALVE_DISPLAY_MINIMAL", "")]);
        assert_eq!(env, PartialLogConfig::default());
        assert_eq!(resolve(None, &PartialLogConfig::default(), &env).output, Output::Stdout);
    }

    #[test]
    fn test_env_display_minimal_parsing() {
        assert_eq!(env_of(&[("BIVALVE_DISPLAY_MINIMAL", "true")]).display_minimal, Some(true));
        assert_eq!(env_of(&[("BIVALVE_DISPLAY_MINIMAL", "1")]).display_minimal, Some(true));
        assert_eq!(env_of(&[("BIVALVE_DISPLAY_MINIMAL", "F")]).display_minimal, Some(false));
        assert_eq!(env_of(&[("BIVALVE_DISPLAY_MINIMAL", "yes")]).display_minimal, None);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.toml");
        fs::write(
            &path,
            "output = \"file\"\nlevel = \"debug\"\nfilename = \"access.log\"\ndisplayMinimal = true\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.output, Some(Output::File));
        assert_eq!(config.level, Some(Level::Debug));
        assert_eq!(config.filename, Some(PathBuf::from("access.log")));
        assert_eq!(config.display_minimal, Some(true));
        assert_eq!(config.terminal_output, None);
    }

    #[test]
    fn test_load_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_config(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let path = dir.path().join("bad.toml");
        fs::write(&path, "level = [").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
    }
}
