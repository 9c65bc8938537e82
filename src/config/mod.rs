//! Settings types and loading for fix-aircraft-fov

mod loader;

#[allow(unused_imports)]
pub use loader::{Defaults, DefaultsLayer, LoggingSettings, Settings, SettingsLayer, expand_path};
