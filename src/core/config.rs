// Loader configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default subdirectory of the data root holding character packages
pub const DEFAULT_CHARACTERS_DIR: &str = "Characters";

/// Default file extension of character packages
pub const DEFAULT_PACKAGE_EXTENSION: &str = "ubcharacter";

/// Default interval between host availability checks
pub const DEFAULT_INJECTION_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Shortest interval between host availability checks
pub const MIN_INJECTION_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for the character loader
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Root of the host's data directory
    data_root: PathBuf,

    /// Name of the package directory under the data root
    characters_dir: String,

    /// Package file extension (without the dot)
    extension: String,

    /// How often the injector checks for the host root object
    injection_poll_interval: Duration,

    /// Substring identifying the baseline entry of the character list
    baseline_character_hint: String,

    /// Name of the object created under the host root during injection
    injected_object_name: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("."),
            characters_dir: DEFAULT_CHARACTERS_DIR.to_string(),
            extension: DEFAULT_PACKAGE_EXTENSION.to_string(),
            injection_poll_interval: DEFAULT_INJECTION_POLL_INTERVAL,
            baseline_character_hint: "beat".to_string(),
            injected_object_name: "CharacterLoaderInjected".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Create a configuration rooted at the given data directory
    pub fn new<P: AsRef<Path>>(data_root: P) -> Self {
        Self::default().with_data_root(data_root)
    }

    pub fn with_data_root<P: AsRef<Path>>(mut self, data_root: P) -> Self {
        self.data_root = data_root.as_ref().to_path_buf();
        self
    }

    pub fn with_characters_dir(mut self, dir: impl Into<String>) -> Self {
        self.characters_dir = dir.into();
        self
    }

    /// Set the package extension; a leading dot is ignored
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Set the poll interval, clamped to `MIN_INJECTION_POLL_INTERVAL`
    pub fn with_injection_poll_interval(mut self, interval: Duration) -> Self {
        self.injection_poll_interval = interval.max(MIN_INJECTION_POLL_INTERVAL);
        self
    }

    pub fn with_baseline_character_hint(mut self, hint: impl Into<String>) -> Self {
        self.baseline_character_hint = hint.into();
        self
    }

    pub fn with_injected_object_name(mut self, name: impl Into<String>) -> Self {
        self.injected_object_name = name.into();
        self
    }

    /// Directory searched for character packages
    pub fn characters_path(&self) -> PathBuf {
        self.data_root.join(&self.characters_dir)
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn injection_poll_interval(&self) -> Duration {
        self.injection_poll_interval
    }

    pub fn baseline_character_hint(&self) -> &str {
        &self.baseline_character_hint
    }

    pub fn injected_object_name(&self) -> &str {
        &self.injected_object_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoaderConfig::default();
        assert_eq!(config.extension(), "ubcharacter");
        assert_eq!(config.injection_poll_interval(), Duration::from_millis(500));
        assert_eq!(config.characters_path(), PathBuf::from("./Characters"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = LoaderConfig::new("/game/data")
            .with_characters_dir("Mods")
            .with_extension(".pkg")
            .with_baseline_character_hint("hero");

        assert_eq!(config.characters_path(), PathBuf::from("/game/data/Mods"));
        assert_eq!(config.extension(), "pkg");
        assert_eq!(config.baseline_character_hint(), "hero");
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let config = LoaderConfig::default().with_injection_poll_interval(Duration::ZERO);
        assert_eq!(config.injection_poll_interval(), MIN_INJECTION_POLL_INTERVAL);

        let config = config.with_injection_poll_interval(Duration::from_millis(20));
        assert_eq!(config.injection_poll_interval(), Duration::from_millis(20));
    }
}
