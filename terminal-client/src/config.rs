pub(crate) use snake_engine::config::{ConfigManager, FileContentProvider, Validate, YamlConfigSerializer};
use snake_engine::games::snake::GameSettings;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "snake_terminal_client_config.yaml";

pub fn get_config_manager(file_path: &str) -> ConfigManager<FileContentProvider, Config, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(file_path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub game: GameSettings,
    pub high_score_file: String,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        if self.high_score_file.is_empty() {
            return Err("high_score_file must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            high_score_file: "snake_high_scores.yaml".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_engine::config::{ContentProvider, ConfigSerializer};
    use snake_engine::games::snake::{ObstacleDensity, WallMode};

    fn get_temp_file_path() -> String {
        use std::env;
        let mut path = env::temp_dir();
        let random_number: u32 = rand::random();
        let file_name = format!("temp_snake_terminal_client_config_{}.yaml", random_number);
        path.push(file_name);
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_string() {
        let default_config = Config::default();
        let serializer = YamlConfigSerializer::new();
        let serialized_string = serializer.serialize(&default_config).unwrap();
        let deserialized_config: Config = serializer.deserialize(&serialized_string).unwrap();
        assert_eq!(default_config, deserialized_config);
    }

    #[test]
    fn test_config_can_be_saved_and_loaded_through_manager() {
        let mut config = Config::default();
        config.game.wall_mode = WallMode::Wrap;
        config.game.obstacles = ObstacleDensity::Few;
        let file_path = get_temp_file_path();
        let manager = get_config_manager(&file_path);

        manager.set_config(&config).unwrap();
        assert_eq!(manager.get_config().unwrap(), config);

        let content = FileContentProvider::new(file_path.clone()).get_content().unwrap().unwrap();
        assert!(content.contains("wall_mode: wrap"));
        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_config_file_does_not_exist_returns_default_config() {
        let manager = get_config_manager("this_file_does_not_exist.yaml");
        assert_eq!(manager.get_config().unwrap(), Config::default());
    }

    #[test]
    fn test_hand_written_config_is_accepted() {
        let content = r#"
            game:
              speed_ms: 100
              grid_size: 25
              wall_mode: collision
              obstacles: many
              fruit_spawn_mode: random
              theme: dark
            high_score_file: scores.yaml
        "#;

        let config: Config = serde_yaml_ng::from_str(content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.game.grid_size, 25);
        assert_eq!(config.high_score_file, "scores.yaml");
    }

    #[test]
    fn test_invalid_config_cant_be_read() {
        let invalid_config_content = r#"
            game:
              speed_ms: 150
              grid_size: 17
              wall_mode: portal
              obstacles: none
              fruit_spawn_mode: timed
              theme: colorful
            high_score_file: scores.yaml
        "#;

        let file_path = get_temp_file_path();
        let content_provider = FileContentProvider::new(file_path.clone());
        content_provider.set_content(invalid_config_content).unwrap();

        let manager: ConfigManager<_, Config, _> = ConfigManager::new(content_provider, YamlConfigSerializer::new());
        let get_result = manager.get_config();
        assert!(get_result.is_err());
        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_empty_high_score_file_is_rejected() {
        let config = Config {
            high_score_file: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
