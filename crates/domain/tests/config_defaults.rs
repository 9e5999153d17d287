use pl_domain::config::{Config, InstructionMode};

#[test]
fn default_generation_parameters() {
    let config = Config::default();
    assert_eq!(config.generation.max_output_tokens, 500);
    assert!((config.generation.temperature - 0.7).abs() < f32::EPSILON);
}

#[test]
fn default_session_has_no_greeting_and_a_fallback() {
    let config = Config::default();
    assert!(config.session.greeting.is_none());
    assert_eq!(
        config.session.fallback_text,
        "Sorry, I could not generate a response."
    );
    assert_eq!(config.session.instruction_mode, InstructionMode::FirstUserTurn);
}

#[test]
fn default_provider_targets_gemini_flash() {
    let config = Config::default();
    assert_eq!(config.provider.model, "gemini-2.0-flash");
    assert_eq!(
        config.provider.base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(config.provider.timeout_ms, 30_000);
}

#[test]
fn partial_toml_keeps_defaults() {
    let toml_str = r#"
[session]
greeting = "Namaste."
persona = "You are a calm guide."
instruction_mode = "system_role"

[generation]
temperature = 0.2

[provider.auth]
env = "GEMINI_API_KEY"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.session.greeting.as_deref(), Some("Namaste."));
    assert_eq!(config.session.instruction_mode, InstructionMode::SystemRole);
    assert_eq!(config.generation.max_output_tokens, 500);
    assert!((config.generation.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(config.provider.auth.env.as_deref(), Some("GEMINI_API_KEY"));
    assert_eq!(config.provider.model, "gemini-2.0-flash");
}

#[test]
fn empty_toml_is_default() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.observability.log_filter, "warn");
    assert!(config.validate().iter().all(|e| e.field != "session.fallback_text"));
}
