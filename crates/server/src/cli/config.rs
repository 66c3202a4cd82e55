use mc_domain::config::{Config, ConfigSeverity};

/// Validate the config, printing any issues. `true` when no errors were found.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    println!("\n{error_count} error(s), {warning_count} warning(s) in {config_path}");

    error_count == 0
}

/// Render the resolved config as TOML. Inline secrets are masked.
pub fn render(config: &Config) -> anyhow::Result<String> {
    let mut redacted = config.clone();
    if redacted.logline.api_key.is_some() {
        redacted.logline.api_key = Some("********".into());
    }
    if redacted.llm.api_key.is_some() {
        redacted.llm.api_key = Some("********".into());
    }
    Ok(toml::to_string_pretty(&redacted)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_masks_inline_keys() {
        let mut config = Config::default();
        config.logline.api_key = Some("ll_secret".into());
        let out = render(&config).unwrap();
        assert!(!out.contains("ll_secret"));
        assert!(out.contains("[logline]"));
        assert!(out.contains("max_tool_calls = 16"));
    }

    #[test]
    fn default_config_validates() {
        assert!(validate(&Config::default(), "config.toml"));
    }
}
