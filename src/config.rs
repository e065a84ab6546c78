use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Env var naming an optional JSON config file.
pub const CONFIG_ENV: &str = "HIV_VIEWER_CONFIG";
/// Env var re-rooting the default data file names.
pub const DATA_DIR_ENV: &str = "HIV_VIEWER_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "data";

/// Locations of the files the viewer reads at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Indicator table (`.csv` or `.parquet`).
    pub dataset: PathBuf,
    /// Indicator descriptions (`indicators.json`).
    pub indicators: PathBuf,
    /// Country boundaries (`countries.geojson`).
    pub boundaries: PathBuf,
    /// Image shown on the introduction page.
    pub infographic: PathBuf,
}

/// Keys present in a JSON config file. Absent keys keep the base value.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    dataset: Option<PathBuf>,
    indicators: Option<PathBuf>,
    boundaries: Option<PathBuf>,
    infographic: Option<PathBuf>,
}

impl ConfigFile {
    fn apply(self, base: AppConfig) -> AppConfig {
        AppConfig {
            dataset: self.dataset.unwrap_or(base.dataset),
            indicators: self.indicators.unwrap_or(base.indicators),
            boundaries: self.boundaries.unwrap_or(base.boundaries),
            infographic: self.infographic.unwrap_or(base.infographic),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::in_dir(Path::new(DEFAULT_DATA_DIR))
    }
}

impl AppConfig {
    /// Default file names under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        AppConfig {
            dataset: dir.join("hiv.csv"),
            indicators: dir.join("indicators.json"),
            boundaries: dir.join("countries.geojson"),
            infographic: dir.join("unicef_ig.png"),
        }
    }

    /// Parse a JSON config over `base`; missing keys keep the base paths.
    pub fn from_json(text: &str, base: AppConfig) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(text).context("parsing viewer config")?;
        Ok(file.apply(base))
    }

    /// Default file names, re-rooted by [`DATA_DIR_ENV`], with any key set in
    /// the file named by [`CONFIG_ENV`] taking precedence.
    pub fn from_env() -> Result<Self> {
        Self::resolve(
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        )
    }

    fn resolve(data_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Result<Self> {
        let base = match data_dir {
            Some(dir) => Self::in_dir(&dir),
            None => Self::default(),
        };
        let Some(path) = config_file else {
            return Ok(base);
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_json(&text, base)?;
        log::info!("Using config {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_live_under_data() {
        let c = AppConfig::default();
        assert_eq!(c.dataset, Path::new("data/hiv.csv"));
        assert_eq!(c.boundaries, Path::new("data/countries.geojson"));
    }

    #[test]
    fn data_dir_reroots_defaults() {
        let c = AppConfig::resolve(Some(PathBuf::from("/srv/unicef")), None).unwrap();
        assert_eq!(c.indicators, Path::new("/srv/unicef/indicators.json"));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let c = AppConfig::from_json(r#"{"dataset": "other/hiv.parquet"}"#, AppConfig::default())
            .unwrap();
        assert_eq!(c.dataset, Path::new("other/hiv.parquet"));
        assert_eq!(c.indicators, Path::new("data/indicators.json"));
    }

    #[test]
    fn config_file_keys_win_over_data_dir() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"boundaries": "geo/world.json"}}"#).unwrap();
        let c = AppConfig::resolve(Some(PathBuf::from("/srv/unicef")), Some(file.path().into()))
            .unwrap();
        assert_eq!(c.boundaries, Path::new("geo/world.json"));
        assert_eq!(c.dataset, Path::new("/srv/unicef/hiv.csv"));
        assert_eq!(c.infographic, Path::new("/srv/unicef/unicef_ig.png"));
    }

    #[test]
    fn config_file_without_data_dir_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"dataset": "hiv.parquet"}}"#).unwrap();
        let c = AppConfig::resolve(None, Some(file.path().into())).unwrap();
        assert_eq!(c.dataset, Path::new("hiv.parquet"));
        assert_eq!(c.indicators, Path::new("data/indicators.json"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::from_json(r#"{"datset": "x.csv"}"#, AppConfig::default()).is_err());
    }
}
