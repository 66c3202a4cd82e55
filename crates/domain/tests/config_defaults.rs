use mc_domain::config::{Config, ConfigSeverity, LogFormat};

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3300);
}

#[test]
fn default_llm_settings_match_agent_contract() {
    let config = Config::default();
    assert_eq!(config.llm.default_model, "claude-3-5-sonnet-20241022");
    assert_eq!(config.llm.max_tokens, 4096);
    assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(config.llm.api_key_env, "ANTHROPIC_API_KEY");
}

#[test]
fn default_logline_settings() {
    let config = Config::default();
    assert!(config.logline.wait);
    assert_eq!(config.logline.timeout_ms, 0);
    assert_eq!(config.logline.app, "minicontratos");
    assert_eq!(config.logline.api_key_env, "LOGLINE_API_KEY");
    assert_eq!(config.agent.max_tool_calls, 16);
    assert!(config.agent.record_interactions);
}

#[test]
fn sections_parse_from_toml() {
    let toml_str = r#"
[logline]
base_url = "http://localhost:8080/api"
api_key = "ll_test"
wait = false

[llm]
default_model = "claude-3-haiku-20240307"
temperature = 0.2

[agent]
max_tool_calls = 4

[logging]
format = "pretty"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.logline.base_url, "http://localhost:8080/api");
    assert_eq!(config.logline.resolve_api_key().as_deref(), Some("ll_test"));
    assert!(!config.logline.wait);
    assert_eq!(config.llm.default_model, "claude-3-haiku-20240307");
    assert_eq!(config.agent.max_tool_calls, 4);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn inline_key_wins_over_env_lookup() {
    let toml_str = r#"
[llm]
api_key = "sk-inline"
api_key_env = "MC_TEST_UNSET_VARIABLE_FOR_LLM"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.llm.resolve_api_key().as_deref(), Some("sk-inline"));
}

#[test]
fn unset_env_resolves_to_none() {
    let toml_str = r#"
[logline]
api_key_env = "MC_TEST_UNSET_VARIABLE_FOR_LOGLINE"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert!(config.logline.resolve_api_key().is_none());
}

#[test]
fn validate_flags_zero_tool_cap_and_bad_temperature() {
    let toml_str = r#"
[llm]
temperature = 1.5

[agent]
max_tool_calls = 0
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    let errors: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .map(|i| i.field.as_str())
        .collect();
    assert!(errors.contains(&"llm.temperature"));
    assert!(errors.contains(&"agent.max_tool_calls"));
}

#[test]
fn validate_defaults_has_no_errors() {
    let config = Config::default();
    assert!(config
        .validate()
        .iter()
        .all(|i| i.severity == ConfigSeverity::Warning));
}
