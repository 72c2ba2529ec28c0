//! Semantic validation for parsed job configuration values.

use anyhow::{bail, Result};

use crate::config::types::JobConfig;

/// Validate a parsed job configuration.
/// Returns Ok(()) if valid, Err with all validation errors if not.
pub fn validate_job(config: &JobConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.version != "1.0" {
        errors.push(format!(
            "Unsupported job version '{}', expected '1.0'",
            config.version
        ));
    }

    if config.job.trim().is_empty() {
        errors.push("Job name must not be empty".to_string());
    }

    if config.environment.base_url.trim().is_empty() {
        errors.push("Environment base_url must not be empty".to_string());
    }

    if config.environment.subdomain.trim().is_empty() {
        errors.push("Environment subdomain must not be empty".to_string());
    }

    if config.environment.api_key.trim().is_empty() {
        errors.push("Environment api_key must not be empty".to_string());
    }

    if config.environment.timeout_secs == 0 {
        errors.push("Environment timeout_secs must be at least 1".to_string());
    }

    if config.people.path.as_os_str().is_empty() {
        errors.push("People path must not be empty".to_string());
    }

    if config.people.enabled && config.people.fields.is_empty() {
        errors.push("People field allow-list must not be empty when people sync is enabled".to_string());
    }

    if config.devices.enabled && config.devices.fields.is_empty() {
        errors.push("Device field allow-list must not be empty when device sync is enabled".to_string());
    }

    if config.groups.enabled {
        if config.groups.path.as_os_str().is_empty() {
            errors.push("Groups path must not be empty".to_string());
        }
        if config.groups.fields.is_empty() {
            errors.push("Group field allow-list must not be empty when group sync is enabled".to_string());
        }
        if config.groups.name_prefix.is_empty() {
            errors.push("Group name_prefix must not be empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        bail!("Job validation failed:\n  - {}", errors.join("\n  - "));
    }
}
