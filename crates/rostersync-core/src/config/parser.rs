//! Job YAML parsing with environment variable substitution.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::types::JobConfig;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var regex"));

/// Substitute `${VAR_NAME}` patterns with environment variable values.
///
/// # Errors
///
/// Returns an error if any referenced environment variable is not set.
pub fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = input.to_string();
    let mut missing = Vec::new();

    for cap in ENV_VAR_RE.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                missing.push(var_name.to_string());
            }
        }
    }

    if !missing.is_empty() {
        anyhow::bail!("Missing environment variable(s): {}", missing.join(", "));
    }

    Ok(result)
}

/// Parse a job YAML string (after env var substitution).
///
/// # Errors
///
/// Returns an error if env var substitution fails or the YAML is invalid.
pub fn parse_job_str(yaml_str: &str) -> Result<JobConfig> {
    let substituted = substitute_env_vars(yaml_str)?;
    let config: JobConfig =
        serde_yaml::from_str(&substituted).context("Failed to parse job YAML")?;
    Ok(config)
}

/// Parse a job YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML is invalid.
pub fn parse_job(path: &Path) -> Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file: {}", path.display()))?;
    parse_job_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_yaml() -> &'static str {
        r#"
version: "1.0"
job: roster_to_directory
environment:
  base_url: https://acme.example.com
  subdomain: acme
  api_key: ${RS_TEST_API_KEY}
people:
  path: ./people.csv
groups:
  path: ./groups.csv
  name_prefix: "Example Group"
"#
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RS_TEST_HOST", "acme.example.com");
        let input = "base_url: https://${RS_TEST_HOST}";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "base_url: https://acme.example.com");
        std::env::remove_var("RS_TEST_HOST");
    }

    #[test]
    fn test_no_env_vars_passthrough() {
        let input = "subdomain: acme";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_missing_env_vars_all_reported() {
        let input = "${RS_MISSING_X} and ${RS_MISSING_Y}";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("RS_MISSING_X"));
        assert!(err_msg.contains("RS_MISSING_Y"));
    }

    #[test]
    fn test_parse_job_from_string() {
        std::env::set_var("RS_TEST_API_KEY", "secret-key");
        let config = parse_job_str(valid_yaml()).unwrap();
        assert_eq!(config.job, "roster_to_directory");
        assert_eq!(config.environment.api_key, "secret-key");
        std::env::remove_var("RS_TEST_API_KEY");
    }

    #[test]
    fn test_parse_job_invalid_yaml_fails() {
        let result = parse_job_str("version: [unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_job_missing_file_fails() {
        let result = parse_job(Path::new("/nonexistent/job.yaml"));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read job file"));
    }
}
