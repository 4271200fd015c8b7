use serde::{Deserialize, Serialize};
use std::{error::Error, fs, path::PathBuf};

/// Returns the path to the user's data directory for PetalPage.
/// This is a public helper function for other modules to use.
pub fn get_user_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|path| path.join(".local/share/petalpage"))
}

/// Gets the full path to the config.toml configuration file.
fn get_config_path() -> Result<PathBuf, Box<dyn Error>> {
    let mut config_path = get_user_data_dir().ok_or("Could not find user's data directory.")?;
    fs::create_dir_all(&config_path)?;
    config_path.push("config.toml");
    Ok(config_path)
}

#[derive(Serialize, Deserialize)]
pub struct Config {
    pub window_width: i32,
    pub window_height: i32,
    pub fullscreen: bool,
    pub sfx_volume: f32,
    pub wallpaper_api: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 960,
            window_height: 600,
            fullscreen: false,
            sfx_volume: 0.5,
            wallpaper_api: "https://api.521567.xyz/api/img/bd.php".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from config.toml, or returns a default if it fails.
    pub fn load() -> Self {
        if let Ok(config_path) = get_config_path() {
            if let Ok(content) = fs::read_to_string(config_path) {
                if let Ok(config) = toml::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Saves the current configuration to config.toml.
    pub fn save(&self) {
        if let Ok(config_path) = get_config_path() {
            if let Ok(toml_string) = toml::to_string_pretty(self) {
                let _ = fs::write(config_path, toml_string);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip() {
        let config = Config {
            window_width: 1280,
            window_height: 720,
            fullscreen: true,
            sfx_volume: 0.25,
            wallpaper_api: "https://example.com/img".to_string(),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.window_width, 1280);
        assert_eq!(back.window_height, 720);
        assert!(back.fullscreen);
        assert_eq!(back.wallpaper_api, "https://example.com/img");
    }

    #[test]
    fn default_points_at_the_public_endpoint() {
        let config = Config::default();
        assert!(config.wallpaper_api.starts_with("https://"));
        assert_eq!(config.sfx_volume, 0.5);
    }
}
