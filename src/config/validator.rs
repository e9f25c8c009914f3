use thiserror::Error;

use crate::config::{
    ChaosSettings, FixtureSettings, ModelSettings, SandboxSettings, ServerSettings, Settings,
};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    /// Collects every problem in `settings` instead of stopping at the first
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(&settings.server, &mut errors);
        Self::validate_model(&settings.model, &mut errors);
        Self::validate_chaos(&settings.chaos, &mut errors);
        Self::validate_sandbox(&settings.sandbox, &mut errors);
        Self::validate_fixture(&settings.fixture, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings, errors: &mut Vec<ValidationError>) {
        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }
    }

    fn validate_model(model: &ModelSettings, errors: &mut Vec<ValidationError>) {
        if model.base_url.is_empty() {
            errors.push(ValidationError::MissingField("model.base_url".to_string()));
        }

        if model.fallback_model.is_empty() {
            errors.push(ValidationError::MissingField("model.fallback_model".to_string()));
        }

        if model.timeout_seconds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "model.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if let Some(temperature) = model.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                errors.push(ValidationError::InvalidValue {
                    field: "model.temperature".to_string(),
                    reason: "Temperature must be between 0.0 and 2.0".to_string(),
                });
            }
        }
    }

    fn validate_chaos(chaos: &ChaosSettings, errors: &mut Vec<ValidationError>) {
        Self::validate_probability("chaos.failure_rate", chaos.failure_rate, errors);
    }

    fn validate_sandbox(sandbox: &SandboxSettings, errors: &mut Vec<ValidationError>) {
        let limits = [
            ("sandbox.max_operations", sandbox.max_operations == 0),
            ("sandbox.max_call_levels", sandbox.max_call_levels == 0),
            ("sandbox.max_expr_depth", sandbox.max_expr_depth == 0),
            ("sandbox.max_string_size", sandbox.max_string_size == 0),
            ("sandbox.max_array_size", sandbox.max_array_size == 0),
            ("sandbox.max_map_size", sandbox.max_map_size == 0),
        ];

        // Zero means "unlimited" to the script engine
        for (field, is_zero) in limits {
            if is_zero {
                errors.push(ValidationError::InvalidValue {
                    field: field.to_string(),
                    reason: "Limit must be greater than 0".to_string(),
                });
            }
        }
    }

    fn validate_fixture(fixture: &FixtureSettings, errors: &mut Vec<ValidationError>) {
        if fixture.host.is_empty() {
            errors.push(ValidationError::MissingField("fixture.host".to_string()));
        }

        if fixture.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "fixture.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        Self::validate_probability("fixture.failure_rate", fixture.failure_rate, errors);
    }

    fn validate_probability(field: &str, value: f64, errors: &mut Vec<ValidationError>) {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ValidationError::InvalidValue {
                field: field.to_string(),
                reason: "Probability must be between 0.0 and 1.0".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(ConfigValidator::validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_invalid_server() {
        let mut settings = Settings::default();
        settings.server.host = String::new();
        settings.server.port = 0;

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_probabilities_out_of_range() {
        let mut settings = Settings::default();
        settings.chaos.failure_rate = 1.5;
        settings.fixture.failure_rate = -0.1;

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        let fields: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert!(fields.iter().any(|e| e.contains("chaos.failure_rate")));
        assert!(fields.iter().any(|e| e.contains("fixture.failure_rate")));
    }

    #[test]
    fn test_nan_probability_is_rejected() {
        let mut settings = Settings::default();
        settings.chaos.failure_rate = f64::NAN;
        assert!(ConfigValidator::validate(&settings).is_err());
    }

    #[test]
    fn test_zero_timeout_and_limits() {
        let mut settings = Settings::default();
        settings.model.timeout_seconds = 0;
        settings.sandbox.max_operations = 0;
        settings.sandbox.max_map_size = 0;

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_temperature_range() {
        let mut settings = Settings::default();
        settings.model.temperature = Some(0.7);
        assert!(ConfigValidator::validate(&settings).is_ok());

        settings.model.temperature = Some(3.0);
        assert!(ConfigValidator::validate(&settings).is_err());
    }
}
