use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::GridConfig;
use crate::provider::{Error, ErrorKind, Result};

const CONFIG_PATH_ENV_VAR: &str = "XIVE_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let config_env = env::var(CONFIG_PATH_ENV_VAR).ok().map(PathBuf::from);

    let home = dirs::home_dir();

    // XDG layout on every platform, not the macOS Application Support dir
    let config_xdg = env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.as_ref().map(|home| home.join(".config")))
        .map(|dir| dir.join("xive").join("config.toml"));
    let home_config = home.map(|dir| dir.join(".xive.toml"));

    config_env
        .into_iter()
        .chain(config_xdg)
        .chain(home_config)
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Ticket payload (`{"data": [...]}`) shown when no other source is given.
    pub tickets: Option<PathBuf>,
    pub calendar: GridConfig,
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|err| {
        Error::from(err)
            .with_msg(&format!("Could not read config '{}'", path.display()))
    })?;

    content.parse::<Config>().map_err(|err| {
        Error::new(
            ErrorKind::ConfigParse,
            &format!("{}: {}", path.display(), err),
        )
    })
}

/// Loads `path` if given, otherwise the first config found in the default
/// locations. Falls back to defaults if there is none.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_config(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => {
            log::info!("Using config '{}'", location.display());
            load_config(&location)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
