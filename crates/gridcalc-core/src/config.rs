//! Evaluation config file loading.
//!
//! The file is TOML with the fields of [`EvalConfig`]:
//!
//! ```toml
//! max_depth = 100
//! division = "error"   # or "infinity"
//! ```

use gridcalc_engine::engine::EvalConfig;
use log::debug;
use std::path::{Path, PathBuf};

use crate::error::{GridcalcError, Result};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// Parse config text.
pub fn parse_config(text: &str, path: &Path) -> Result<EvalConfig> {
    toml::from_str::<EvalConfig>(text).map_err(|err| GridcalcError::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Read and parse a config file.
pub fn read_config(path: &Path) -> Result<EvalConfig> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(GridcalcError::Config {
            path: path.to_path_buf(),
            message: format!(
                "file too large ({} bytes, max {})",
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Load the evaluation config.
///
/// An explicit file must exist; the default file is used only if present.
/// Problems never abort: the defaults are returned along with warnings.
pub fn load_config(
    config_file: Option<&PathBuf>,
    default_path: Option<PathBuf>,
) -> (EvalConfig, Vec<String>) {
    let mut warnings = Vec::new();
    let path = match (config_file, default_path) {
        (Some(path), _) => {
            if !path.exists() {
                warnings.push(format!("Config file not found: {}", path.display()));
                return (EvalConfig::default(), warnings);
            }
            path.clone()
        }
        (None, Some(path)) if path.is_file() => path,
        (None, _) => return (EvalConfig::default(), warnings),
    };

    match read_config(&path) {
        Ok(config) => {
            debug!("loaded config from {}: {:?}", path.display(), config);
            (config, warnings)
        }
        Err(err) => {
            warnings.push(format!("Ignoring config {}: {}", path.display(), err));
            (EvalConfig::default(), warnings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_engine::engine::DivisionPolicy;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "gridcalc_{}_{}_{:?}.toml",
            name,
            std::process::id(),
            std::thread::current().id(),
        ))
    }

    #[test]
    fn parse_config_reads_fields() {
        let config = parse_config(
            "max_depth = 5\ndivision = \"infinity\"\n",
            Path::new("test.toml"),
        )
        .unwrap();
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.division, DivisionPolicy::Infinity);
    }

    #[test]
    fn parse_config_fills_defaults() {
        let config = parse_config("max_depth = 7\n", Path::new("test.toml")).unwrap();
        assert_eq!(config.max_depth, 7);
        assert_eq!(config.division, DivisionPolicy::Error);
    }

    #[test]
    fn parse_config_rejects_unknown_fields() {
        let err = parse_config("depth = 7\n", Path::new("test.toml")).unwrap_err();
        assert!(matches!(err, GridcalcError::Config { .. }));
    }

    #[test]
    fn load_config_missing_explicit_file_warns() {
        let path = temp_path("missing");
        let (config, warnings) = load_config(Some(&path), None);
        assert_eq!(config, EvalConfig::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn load_config_missing_default_file_is_silent() {
        let (config, warnings) = load_config(None, Some(temp_path("absent_default")));
        assert_eq!(config, EvalConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn load_config_reads_file_and_falls_back_on_errors() {
        let good = temp_path("good");
        std::fs::write(&good, "division = \"infinity\"\n").expect("write temp config");
        let (config, warnings) = load_config(Some(&good), None);
        assert_eq!(config.division, DivisionPolicy::Infinity);
        assert!(warnings.is_empty());
        let _ = std::fs::remove_file(&good);

        let bad = temp_path("bad");
        std::fs::write(&bad, "max_depth = \"lots\"\n").expect("write temp config");
        let (config, warnings) = load_config(None, Some(bad.clone()));
        assert_eq!(config, EvalConfig::default());
        assert!(!warnings.is_empty());
        let _ = std::fs::remove_file(&bad);
    }
}
