use crate::analysis::types::Exercise;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub session: SessionSettings,
    pub capture: CaptureSettings,
    pub foodlog: FoodLogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub tick_period_ms: u64,
    pub default_exercise: Exercise,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_period_ms: 2_000,
            default_exercise: Exercise::Squat,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub image_path: String,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            image_path: "frame.jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FoodLogSettings {
    pub path: String,
}

impl Default for FoodLogSettings {
    fn default() -> Self {
        Self {
            path: "fitcoach-foodlog.json".to_string(),
        }
    }
}

impl Settings {
    // Layers an optional fitcoach.toml and FITCOACH__* environment variables
    // over the built-in defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("fitcoach").required(false))
            .add_source(config::Environment::with_prefix("FITCOACH").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let settings = Settings::default();
        assert_eq!(settings.session.tick_period_ms, 2_000);
        assert_eq!(settings.session.default_exercise, Exercise::Squat);
        assert_eq!(settings.backend.base_url, "http://localhost:8000");
        assert_eq!(settings.backend.request_timeout_ms, 10_000);
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [backend]
                base_url = "http://coach.example:9000"

                [session]
                tick_period_ms = 500
                default_exercise = "lunge"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.backend.base_url, "http://coach.example:9000");
        assert_eq!(settings.backend.request_timeout_ms, 10_000);
        assert_eq!(settings.session.tick_period_ms, 500);
        assert_eq!(settings.session.default_exercise, Exercise::Lunge);
    }
}
