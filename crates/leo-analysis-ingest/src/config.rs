use anyhow::{Context, Result};
use leo_analysis_abstract::{IngestConfig, IngestConfigOverride};
use std::fs;
use std::path::Path;

/// Parse a TOML document holding any subset of [`IngestConfig`] fields.
/// Absent fields keep their defaults.
pub fn parse_config(content: &str) -> Result<IngestConfig> {
    let overrides: IngestConfigOverride =
        toml::from_str(content).context("Failed to parse ingestion config")?;
    let mut config = IngestConfig::default();
    overrides.apply_to(&mut config);
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<IngestConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leo_analysis_abstract::DEFAULT_PROGRESS_INTERVAL;
    use std::path::PathBuf;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
vector_path = "out/run-1.vec"
sample_capacity = 1000
seed = 7
"#,
        )
        .unwrap();

        assert_eq!(config.vector_path, PathBuf::from("out/run-1.vec"));
        assert_eq!(config.sample_capacity, 1000);
        assert_eq!(config.seed, 7);
        assert_eq!(config.progress_interval, DEFAULT_PROGRESS_INTERVAL);
        assert_eq!(config.scalar_path, IngestConfig::default().scalar_path);
    }

    #[test]
    fn test_bad_types_are_rejected() {
        assert!(parse_config("sample_capacity = \"many\"").is_err());
    }

    #[test]
    fn test_missing_config_file_names_path() {
        let err = load_config(Path::new("/missing/ingest.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/missing/ingest.toml"));
    }
}
