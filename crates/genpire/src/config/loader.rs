use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| format!("{} at {}", e, e.instance_path()))
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Validate version
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    for (name, base_url) in [
        ("completion", &config.completion.endpoint.base_url),
        ("image_synthesis", &config.image_synthesis.base_url),
        ("model_tasks", &config.model_tasks.base_url),
    ] {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation {
                message: format!("{} base_url must be http(s), got '{}'", name, base_url),
            });
        }
    }

    if config.artifact_directory.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "artifact_directory must not be empty".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> String {
        r#"
        {
            "version": "1.0",
            "artifact_directory": "/var/lib/genpire/artifacts",
            "public_base_url": "https://cdn.genpire.test",
            "completion": {
                "base_url": "https://api.openai.test/v1",
                "api_key_env": "OPENAI_API_KEY"
            },
            "image_synthesis": {
                "base_url": "https://api.images.test/v1",
                "api_key_env": "IMAGE_API_KEY"
            },
            "model_tasks": {
                "base_url": "https://api.meshy.test/v2",
                "api_key_env": "MESHY_API_KEY"
            }
        }
        "#
        .to_string()
    }

    #[test]
    fn test_load_valid_config() {
        let config = load_config_from_str(&minimal_config()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.artifact_directory, "/var/lib/genpire/artifacts");
        // Model defaults fill in.
        assert_eq!(config.completion.vision_model, "gpt-4o");
        assert_eq!(config.completion.text_model, "gpt-4o-mini");
    }

    #[test]
    fn test_load_config_with_model_overrides() {
        let config_json = minimal_config().replace(
            "\"api_key_env\": \"OPENAI_API_KEY\"",
            "\"api_key_env\": \"OPENAI_API_KEY\", \"vision_model\": \"gpt-5-vision\"",
        );
        let config = load_config_from_str(&config_json).unwrap();
        assert_eq!(config.completion.vision_model, "gpt-5-vision");
    }

    #[test]
    fn test_invalid_version() {
        let config_json = minimal_config().replace("\"version\": \"1.0\"", "\"version\": \"2.0\"");
        assert!(load_config_from_str(&config_json).is_err());
    }

    #[test]
    fn test_missing_required_section() {
        let config_json = minimal_config().replace("model_tasks", "model_tasks_gone");
        let result = load_config_from_str(&config_json);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_http_base_url() {
        let config_json = minimal_config().replace(
            "https://api.meshy.test/v2",
            "ftp://api.meshy.test/v2",
        );
        assert!(load_config_from_str(&config_json).is_err());
    }

    #[test]
    fn test_not_json() {
        assert!(load_config_from_str("version: 1.0").is_err());
    }
}
