use crate::config::AppConfig;
use crate::config_loader::ConfigLoader;
use anyhow::Result;
use notify::{Event, RecursiveMode, Watcher};
use std::path::PathBuf;
use tokio::sync::watch;

/// Reloads the config file on change and broadcasts the new value.
///
/// Consumers hold the receiver and read the current value on every
/// evaluation, so nothing derived from the old config survives a reload.
pub struct ConfigWatcher {
    tx: watch::Sender<AppConfig>,
    path: PathBuf,
    profile: Option<String>,
}

impl ConfigWatcher {
    /// Creates a new configuration watcher with an initial configuration.
    ///
    /// Returns a tuple of the watcher and a receiver for configuration updates.
    #[must_use]
    pub fn new(
        initial_config: AppConfig,
        path: impl Into<PathBuf>,
    ) -> (Self, watch::Receiver<AppConfig>) {
        let (tx, rx) = watch::channel(initial_config);
        (
            Self {
                tx,
                path: path.into(),
                profile: None,
            },
            rx,
        )
    }

    /// Reloads through the given profile overlay as well as the base file.
    #[must_use]
    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    /// Files whose changes trigger a reload.
    #[must_use]
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.path.clone()];
        if let Some(profile) = &self.profile {
            paths.push(ConfigLoader::profile_path(&self.path, profile));
        }
        paths
    }

    /// Returns another receiver for the same channel.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppConfig> {
        self.tx.subscribe()
    }

    /// Reloads the file once and broadcasts it if it changed.
    ///
    /// Returns true when subscribers were notified.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed; the previous value stays current.
    pub fn reload(&self) -> Result<bool> {
        let config = match &self.profile {
            Some(profile) => ConfigLoader::load_with_profile(&self.path, profile)?,
            None => ConfigLoader::load_from(&self.path)?,
        };
        Ok(self.tx.send_if_modified(|current| {
            if *current == config {
                false
            } else {
                *current = config;
                true
            }
        }))
    }

    /// Watches the configuration file for changes and broadcasts updates.
    ///
    /// # Errors
    ///
    /// Returns an error if file watching cannot be initiated or if the watcher task fails.
    pub async fn watch(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let (notify_tx, notify_rx) = std::sync::mpsc::channel();

            let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            })?;

            for path in self.watched_paths() {
                if path.exists() {
                    watcher.watch(&path, RecursiveMode::NonRecursive)?;
                } else {
                    tracing::warn!(path = %path.display(), "Config file not found, not watching");
                }
            }

            for event in notify_rx {
                if event.kind.is_modify() {
                    let changed = event.paths.first().map_or(self.path.as_path(), |p| p.as_path());
                    tracing::info!(path = %changed.display(), "Config file changed, reloading...");
                    match self.reload() {
                        Ok(true) => tracing::info!("Config reloaded successfully"),
                        Ok(false) => tracing::debug!("Config unchanged after reload"),
                        Err(e) => tracing::error!("Failed to reload config: {}", e),
                    }
                }
            }

            Ok::<_, anyhow::Error>(())
        })
        .await??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_broadcasts_changes_once() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("Config.toml", "[sentiment]\nsignal_list_limit = 5\n")?;
            let (watcher, mut rx) = ConfigWatcher::new(AppConfig::default(), "Config.toml");

            assert!(!watcher.reload().map_err(|e| e.to_string())?);
            assert!(!rx.has_changed().map_err(|e| e.to_string())?);

            jail.create_file("Config.toml", "[sentiment]\nsignal_list_limit = 3\n")?;
            assert!(watcher.reload().map_err(|e| e.to_string())?);
            assert!(rx.has_changed().map_err(|e| e.to_string())?);
            assert_eq!(rx.borrow_and_update().sentiment.signal_list_limit, 3);
            Ok(())
        });
    }

    #[test]
    fn reload_keeps_profile_overlay() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("Config.toml", "[sentiment]\nsignal_list_limit = 5\n")?;
            jail.create_file("Config.prod.toml", "[sentiment]\nsignal_list_limit = 2\n")?;
            let initial = ConfigLoader::load_with_profile("Config.toml", "prod")
                .map_err(|e| e.to_string())?;
            let (watcher, rx) = ConfigWatcher::new(initial, "Config.toml");
            let watcher = watcher.with_profile(Some("prod".to_string()));

            assert!(!watcher.reload().map_err(|e| e.to_string())?);
            assert_eq!(rx.borrow().sentiment.signal_list_limit, 2);

            jail.create_file("Config.prod.toml", "[sentiment]\nsignal_list_limit = 3\n")?;
            assert!(watcher.reload().map_err(|e| e.to_string())?);
            assert_eq!(rx.borrow().sentiment.signal_list_limit, 3);
            Ok(())
        });
    }

    #[test]
    fn profile_file_is_watched() {
        let (watcher, _rx) = ConfigWatcher::new(AppConfig::default(), "config/Config.toml");
        assert_eq!(watcher.watched_paths().len(), 1);

        let watcher = watcher.with_profile(Some("prod".to_string()));
        assert_eq!(
            watcher.watched_paths(),
            vec![
                PathBuf::from("config/Config.toml"),
                PathBuf::from("config/Config.prod.toml")
            ]
        );
    }

    #[test]
    fn reload_keeps_previous_value_on_parse_error() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("Config.toml", "[sentiment]\nsignal_list_limit = \"many\"\n")?;
            let (watcher, rx) = ConfigWatcher::new(AppConfig::default(), "Config.toml");
            assert!(watcher.reload().is_err());
            assert_eq!(rx.borrow().sentiment.signal_list_limit, 5);
            Ok(())
        });
    }
}
