//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator runs them all and
//! collects every problem into a single `ConfigError`.

mod helpers;
mod server;
mod upload;


use crate::schema::LoanchatConfig;
use loanchat_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &LoanchatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    server::validate_server(&mut errors, config);
    upload::validate_upload(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
