//! Settings loading with multi-layer merge

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings after every layer has been merged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Defaults for command-line options
    pub defaults: Defaults,

    pub logging: LoggingSettings,
}

/// Values used when the matching flag is not given
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    /// Suffix for backup files, with or without the leading dot
    pub backup_ext: String,

    /// Camera Title to match
    pub camera_name: String,

    /// New InitialZoom value
    pub camera_zoom: f64,

    /// Reject duplicate sections and keys
    pub strict: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            backup_ext: "fix_aircraft_fov".to_string(),
            camera_name: "Pilot".to_string(),
            camera_zoom: 0.35,
            strict: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Append logs to this file in addition to stderr
    pub file: Option<PathBuf>,
}

/// One settings file as written on disk; absent fields leave earlier layers alone
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsLayer {
    #[serde(default)]
    pub defaults: DefaultsLayer,

    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsLayer {
    pub backup_ext: Option<String>,
    pub camera_name: Option<String>,
    pub camera_zoom: Option<f64>,
    pub strict: Option<bool>,
}

impl SettingsLayer {
    /// Load one layer from a specific file
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let layer: Self = toml::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(layer)
    }
}

impl Settings {
    /// Load settings from the standard hierarchy
    ///
    /// Load order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. ~/.config/fix-aircraft-fov/config.toml
    /// 3. The file passed with --config
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let user_path = Self::user_config_path().filter(|p| p.exists());
        let explicit = explicit.map(expand_path);
        Self::load_layers(user_path.iter().chain(explicit.iter()).map(PathBuf::as_path))
    }

    /// Merge the given files over the built-in defaults, in order
    pub fn load_layers<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Result<Self> {
        let mut settings = Self::default();
        for path in paths {
            let layer = SettingsLayer::load_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            settings.merge(layer);
        }
        Ok(settings)
    }

    /// Get the user settings path (~/.config/fix-aircraft-fov/config.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fix-aircraft-fov/config.toml"))
    }

    /// Merge a layer into these settings; every field the layer sets wins
    pub fn merge(&mut self, layer: SettingsLayer) {
        let DefaultsLayer {
            backup_ext,
            camera_name,
            camera_zoom,
            strict,
        } = layer.defaults;

        if let Some(backup_ext) = backup_ext {
            self.defaults.backup_ext = backup_ext;
        }
        if let Some(camera_name) = camera_name {
            self.defaults.camera_name = camera_name;
        }
        if let Some(camera_zoom) = camera_zoom {
            self.defaults.camera_zoom = camera_zoom;
        }
        if let Some(strict) = strict {
            self.defaults.strict = strict;
        }

        if layer.logging.file.is_some() {
            self.logging.file = layer.logging.file;
        }
    }
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.defaults.backup_ext, "fix_aircraft_fov");
        assert_eq!(settings.defaults.camera_name, "Pilot");
        assert_eq!(settings.defaults.camera_zoom, 0.35);
        assert!(settings.defaults.strict);
        assert!(settings.logging.file.is_none());
    }

    #[test]
    fn test_load_settings_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
            [defaults]
            camera_zoom = 0.5
            strict = false

            [logging]
            file = "/tmp/fov.log"
        "#
        )
        .unwrap();

        let layer = SettingsLayer::load_file(&path).unwrap();
        assert_eq!(layer.defaults.camera_zoom, Some(0.5));
        assert_eq!(layer.defaults.strict, Some(false));
        assert_eq!(layer.defaults.camera_name, None);
        assert_eq!(layer.logging.file, Some(PathBuf::from("/tmp/fov.log")));

        let settings = Settings::load_layers([path.as_path()]).unwrap();
        assert_eq!(settings.defaults.camera_zoom, 0.5);
        assert!(!settings.defaults.strict);
        assert_eq!(settings.defaults.camera_name, "Pilot");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\ncamera_fov = 1.0\n").unwrap();

        assert!(SettingsLayer::load_file(&path).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = Settings::load(Some(dir.path().join("nope.toml").as_path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_merge() {
        let mut base = Settings::default();
        base.defaults.camera_name = "Copilot".into();
        base.logging.file = Some(PathBuf::from("base.log"));

        let layer = SettingsLayer {
            defaults: DefaultsLayer {
                backup_ext: Some("bak".into()),
                strict: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };

        base.merge(layer);

        // Untouched fields in the later layer keep earlier values
        assert_eq!(base.defaults.camera_name, "Copilot");
        assert_eq!(base.logging.file, Some(PathBuf::from("base.log")));

        assert_eq!(base.defaults.backup_ext, "bak");
        assert!(!base.defaults.strict);
    }

    #[test]
    fn test_later_file_restores_default_values() {
        let dir = TempDir::new().unwrap();
        let user = dir.path().join("user.toml");
        std::fs::write(
            &user,
            "[defaults]\nstrict = false\ncamera_name = \"Copilot\"\ncamera_zoom = 0.5\nbackup_ext = \"bak\"\n",
        )
        .unwrap();
        let explicit = dir.path().join("ci.toml");
        std::fs::write(
            &explicit,
            "[defaults]\nstrict = true\ncamera_name = \"Pilot\"\ncamera_zoom = 0.35\nbackup_ext = \"fix_aircraft_fov\"\n",
        )
        .unwrap();

        let settings = Settings::load_layers([user.as_path(), explicit.as_path()]).unwrap();
        assert_eq!(settings.defaults, Defaults::default());

        let reversed = Settings::load_layers([explicit.as_path(), user.as_path()]).unwrap();
        assert!(!reversed.defaults.strict);
        assert_eq!(reversed.defaults.camera_name, "Copilot");
        assert_eq!(reversed.defaults.camera_zoom, 0.5);
        assert_eq!(reversed.defaults.backup_ext, "bak");
    }

    #[test]
    fn test_expand_path_leaves_plain_paths() {
        assert_eq!(
            expand_path(Path::new("/opt/Community")),
            PathBuf::from("/opt/Community")
        );
    }
}
