use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by merging defaults, a TOML file, `FXS_` environment
    /// variables, and an optional JSON file next to the TOML one.
    ///
    /// Missing files are skipped. Nested keys use a double underscore, e.g.
    /// `FXS_DATABASE__URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let config: AppConfig = Self::base(path)
            .merge(Env::prefixed("FXS_").split("__"))
            .join(Json::file(path.with_extension("json")))
            .extract()?;

        Ok(config)
    }

    /// Loads configuration with a profile overlay, e.g. `config/Config.prod.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(path: impl AsRef<Path>, profile: &str) -> Result<AppConfig> {
        let path = path.as_ref();
        let config: AppConfig = Self::base(path)
            .merge(Toml::file(Self::profile_path(path, profile)))
            .merge(Env::prefixed("FXS_").split("__"))
            .join(Json::file(path.with_extension("json")))
            .extract()?;

        Ok(config)
    }

    /// Overlay file for `profile` next to `path`, e.g. `Config.prod.toml`.
    #[must_use]
    pub fn profile_path(path: impl AsRef<Path>, profile: &str) -> PathBuf {
        path.as_ref().with_extension(format!("{profile}.toml"))
    }

    fn base(path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
    }
}
