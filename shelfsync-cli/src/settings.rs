//! Effective settings for one invocation.
//!
//! Each value is resolved through a priority chain:
//!
//! 1. Command-line flag
//! 2. Environment variable (`SHELFSYNC_DATA_DIR`, `SHELFSYNC_DB`)
//! 3. Settings file: `--config`, else `./shelfsync.toml`, else
//!    `~/.config/shelfsync/settings.toml`
//! 4. Built-in default
//!
//! Relative paths in a settings file are taken relative to that file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use shelfsync_import::CatalogPaths;

use crate::CliError;

pub(crate) const ENV_DATA_DIR: &str = "SHELFSYNC_DATA_DIR";
pub(crate) const ENV_DATABASE: &str = "SHELFSYNC_DB";

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingSource {
    /// Given on the command line.
    Flag,
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the settings file.
    ConfigFile,
    /// Derived from another setting.
    Derived,
    /// Hard-coded default value.
    Default,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "flag"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Derived => write!(f, "derived"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// A resolved value and its provenance.
#[derive(Debug, Clone)]
pub(crate) struct Setting<T> {
    pub value: T,
    pub source: SettingSource,
}

impl<T> Setting<T> {
    fn new(value: T, source: SettingSource) -> Self {
        Self { value, source }
    }
}

/// Contents of `settings.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SettingsFile {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub public_prefix: Option<String>,
    pub currency: Option<String>,
    pub workers: Option<usize>,
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub(crate) struct Overrides {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub workers: Option<usize>,
}

#[derive(Debug)]
pub(crate) struct Settings {
    /// The settings file that was read, if any.
    pub file: Option<PathBuf>,
    /// Holds `inbox/`, `uploads/` and `archive/`.
    pub data_dir: Setting<PathBuf>,
    /// Holds the generated `img/` tree.
    pub output_dir: Setting<PathBuf>,
    pub database: Setting<PathBuf>,
    pub public_prefix: Setting<String>,
    pub currency: Setting<String>,
    /// 0 means one worker per core.
    pub workers: Setting<usize>,
}

/// Per-user settings file: `<config_dir>/shelfsync/settings.toml`.
pub(crate) fn user_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shelfsync").join("settings.toml"))
}

/// Settings file to read: the explicit one, else the first that exists.
fn locate_settings_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("shelfsync.toml");
    if local.is_file() {
        return Some(local);
    }
    user_settings_path().filter(|p| p.is_file())
}

fn read_settings_file(path: &Path) -> Result<SettingsFile, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::config(format!("Cannot read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| CliError::config(format!("Invalid settings in {}: {}", path.display(), e)))
}

impl Settings {
    /// Resolve settings from flags, the process environment, and the settings file.
    pub(crate) fn load(overrides: &Overrides) -> Result<Self, CliError> {
        let file = match locate_settings_file(overrides.config.as_deref()) {
            Some(path) => {
                let parsed = read_settings_file(&path)?;
                log::debug!("Loaded settings from {}", path.display());
                Some((path, parsed))
            }
            None => None,
        };
        Ok(Self::resolve(overrides, |var| std::env::var(var).ok(), file))
    }

    /// Apply the priority chain to already-gathered inputs.
    pub(crate) fn resolve(
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
        file: Option<(PathBuf, SettingsFile)>,
    ) -> Self {
        let (file_path, file) = match file {
            Some((path, parsed)) => (Some(path), parsed),
            None => (None, SettingsFile::default()),
        };
        let base = file_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let from_file = |p: PathBuf| Setting::new(base.join(p), SettingSource::ConfigFile);
        let env_path = |var: &'static str| {
            env(var)
                .filter(|v| !v.is_empty())
                .map(|v| Setting::new(PathBuf::from(v), SettingSource::EnvVar(var)))
        };

        let data_dir = overrides
            .data_dir
            .clone()
            .map(|p| Setting::new(p, SettingSource::Flag))
            .or_else(|| env_path(ENV_DATA_DIR))
            .or_else(|| file.data_dir.clone().map(from_file))
            .unwrap_or_else(|| Setting::new(PathBuf::from("data"), SettingSource::Default));

        let output_dir = overrides
            .output_dir
            .clone()
            .map(|p| Setting::new(p, SettingSource::Flag))
            .or_else(|| file.output_dir.clone().map(from_file))
            .unwrap_or_else(|| Setting::new(PathBuf::from("public"), SettingSource::Default));

        let database = overrides
            .database
            .clone()
            .map(|p| Setting::new(p, SettingSource::Flag))
            .or_else(|| env_path(ENV_DATABASE))
            .or_else(|| file.database.clone().map(from_file))
            .unwrap_or_else(|| {
                Setting::new(data_dir.value.join("catalog.db"), SettingSource::Derived)
            });

        let public_prefix = file
            .public_prefix
            .clone()
            .map(|p| Setting::new(p, SettingSource::ConfigFile))
            .unwrap_or_else(|| Setting::new("/assets".to_string(), SettingSource::Default));

        let currency = file
            .currency
            .clone()
            .map(|c| Setting::new(c, SettingSource::ConfigFile))
            .unwrap_or_else(|| Setting::new("RUB".to_string(), SettingSource::Default));

        let workers = overrides
            .workers
            .map(|n| Setting::new(n, SettingSource::Flag))
            .or_else(|| file.workers.map(|n| Setting::new(n, SettingSource::ConfigFile)))
            .unwrap_or_else(|| Setting::new(0, SettingSource::Default));

        Self {
            file: file_path,
            data_dir,
            output_dir,
            database,
            public_prefix,
            currency,
            workers,
        }
    }

    pub(crate) fn catalog_paths(&self) -> CatalogPaths {
        CatalogPaths::from_data_dir(
            &self.data_dir.value,
            &self.output_dir.value,
            &self.public_prefix.value,
        )
    }
}
