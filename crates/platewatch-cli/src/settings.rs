use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use platewatch_types::RoiRect;
use serde::{Deserialize, Serialize};

use crate::cli::{CliArgs, CliSources};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct FileConfig {
    pub(crate) camera_id: Option<String>,
    pub(crate) source: Option<String>,
    pub(crate) enable_ocr: Option<bool>,
    pub(crate) live_fps: Option<u32>,
    pub(crate) ocr_fps: Option<u32>,
    pub(crate) ocr_engine: Option<String>,
    pub(crate) roi: Option<RoiFileConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy)]
#[serde(default)]
pub(crate) struct RoiFileConfig {
    pub(crate) x1: i64,
    pub(crate) y1: i64,
    pub(crate) x2: i64,
    pub(crate) y2: i64,
}

#[derive(Debug, Clone)]
pub struct EffectiveSettings {
    pub camera_id: String,
    pub source: String,
    pub enable_ocr: bool,
    pub live_fps: u32,
    pub ocr_fps: u32,
    pub ocr_engine: String,
    pub roi: Option<RoiRect>,
}

impl EffectiveSettings {
    pub fn ocr_engine_selection(&self) -> Option<platewatch_ocr::Selection> {
        platewatch_ocr::Selection::from_str(&self.ocr_engine).ok()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    NotFound { path: PathBuf },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config file {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config file {}: {}", path.display(), source)
            }
            ConfigError::NotFound { path } => {
                write!(f, "config file {} does not exist", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn resolve(cli: &CliArgs, sources: &CliSources) -> Result<EffectiveSettings, ConfigError> {
    let (file, _path) = load_config(cli.config.as_deref())?;
    Ok(merge(cli, sources, file))
}

fn load_config(path_override: Option<&Path>) -> Result<(FileConfig, Option<PathBuf>), ConfigError> {
    if let Some(path) = path_override {
        let path = path.to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound { path });
        }
        return Ok((read_toml(&path)?, Some(path)));
    }

    if let Some(project_path) = project_config_path() {
        if project_path.exists() {
            return Ok((read_toml(&project_path)?, Some(project_path)));
        }
    }

    Ok((FileConfig::default(), None))
}

fn read_toml(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("rs", "platewatch", "platewatch")
        .map(|dirs| dirs.config_dir().join("platewatch.toml"))
}

fn merge(cli: &CliArgs, sources: &CliSources, file: FileConfig) -> EffectiveSettings {
    let camera_id = if sources.camera_id_from_cli {
        cli.camera_id.clone()
    } else {
        file.camera_id.unwrap_or_else(|| cli.camera_id.clone())
    };

    let source = if sources.source_from_cli {
        cli.source.clone()
    } else {
        file.source.unwrap_or_else(|| cli.source.clone())
    };

    let enable_ocr = !cli.no_ocr && file.enable_ocr.unwrap_or(true);

    let live_fps = if sources.live_fps_from_cli {
        cli.live_fps.unwrap_or(15)
    } else {
        file.live_fps.or(cli.live_fps).unwrap_or(15)
    };

    let ocr_fps = if sources.ocr_fps_from_cli {
        cli.ocr_fps.unwrap_or(2)
    } else {
        file.ocr_fps.or(cli.ocr_fps).unwrap_or(2)
    };

    let ocr_engine = if sources.ocr_engine_from_cli {
        cli.ocr_engine.clone().unwrap_or_else(|| "hybrid".to_string())
    } else {
        file.ocr_engine
            .or_else(|| cli.ocr_engine.clone())
            .unwrap_or_else(|| "hybrid".to_string())
    };

    let roi = if sources.roi_from_cli {
        cli.roi
    } else {
        file.roi
            .map(|r| RoiRect::new(r.x1, r.y1, r.x2, r.y2))
            .or(cli.roi)
    };

    EffectiveSettings {
        camera_id,
        source,
        enable_ocr,
        live_fps,
        ocr_fps,
        ocr_engine,
        roi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliArgs;
    use std::io::Write;

    fn default_cli() -> CliArgs {
        CliArgs {
            config: None,
            camera_id: "camera-1".to_string(),
            source: "mock".to_string(),
            no_ocr: false,
            live_fps: None,
            ocr_fps: None,
            ocr_engine: None,
            roi: None,
            list_backends: false,
        }
    }

    #[test]
    fn missing_override_path_is_reported() {
        let err = load_config(Some(Path::new("/nonexistent/platewatch.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn file_values_fill_in_unset_cli_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"camera_id = "cam-7"
live_fps = 30
ocr_engine = "paddle""#)
            .unwrap();

        let (config, _path) = load_config(Some(file.path())).unwrap();
        let cli = default_cli();
        let sources = CliSources::default();
        let resolved = merge(&cli, &sources, config);

        assert_eq!(resolved.camera_id, "cam-7");
        assert_eq!(resolved.live_fps, 30);
        assert_eq!(resolved.ocr_engine, "paddle");
    }

    #[test]
    fn explicit_cli_flag_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"camera_id = "cam-7""#).unwrap();

        let (config, _path) = load_config(Some(file.path())).unwrap();
        let mut cli = default_cli();
        cli.camera_id = "cam-override".to_string();
        let mut sources = CliSources::default();
        sources.camera_id_from_cli = true;
        let resolved = merge(&cli, &sources, config);

        assert_eq!(resolved.camera_id, "cam-override");
    }

    #[test]
    fn no_ocr_flag_disables_regardless_of_file() {
        let mut cli = default_cli();
        cli.no_ocr = true;
        let resolved = merge(&cli, &CliSources::default(), FileConfig {
            enable_ocr: Some(true),
            ..FileConfig::default()
        });
        assert!(!resolved.enable_ocr);
    }
}
