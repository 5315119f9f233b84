use agent_core::{AgentConfig, ConfigError, EntityClass};

#[test]
fn partial_document_falls_back_to_defaults() {
    let config = AgentConfig::from_toml_str(
        r#"
        critical_health_threshold = 25
        danger_radius = 12.5
        "#,
    )
    .expect("partial config should parse");

    assert_eq!(config.critical_health_threshold, 25.0);
    assert_eq!(config.danger_radius, 12.5);
    assert_eq!(
        config.target_ticks_per_second,
        AgentConfig::DEFAULT_TICKS_PER_SECOND
    );
    assert_eq!(config.confidence_threshold, AgentConfig::DEFAULT_CONFIDENCE);
}

#[test]
fn unknown_keys_are_ignored() {
    let config = AgentConfig::from_toml_str(
        r#"
        hunger_threshold = 40
        mouse_sensitivity = 1.5
        debug_mode = true
        "#,
    )
    .expect("unknown keys should not fail parsing");

    assert_eq!(config.hunger_threshold, 40.0);
}

#[test]
fn label_tables_can_be_overridden() {
    let config = AgentConfig::from_toml_str(
        r#"
        [labels]
        hostile = ["zombie"]

        [threat_ratings]
        zombie = 0.8
        "#,
    )
    .expect("label overrides should parse");

    assert_eq!(config.classify("zombie"), Some(EntityClass::Hostile));
    assert_eq!(config.classify("wolf"), None);
    // Untouched lists keep their defaults.
    assert_eq!(config.classify("tree"), Some(EntityClass::Resource));
    assert_eq!(config.threat_rating("zombie"), 0.8);
}

#[test]
fn malformed_values_fail_fast() {
    let err = AgentConfig::from_toml_str("confidence_threshold = 1.5").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::OutOfRange {
            key: "confidence_threshold",
            ..
        }
    ));

    let err = AgentConfig::from_toml_str("target_ticks_per_second = 0").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::OutOfRange {
            key: "target_ticks_per_second",
            ..
        }
    ));

    let err = AgentConfig::from_toml_str("[threat_ratings]\nwolf = 2.0").unwrap_err();
    assert!(matches!(err, ConfigError::ThreatRating { .. }));
}

#[test]
fn type_errors_are_parse_errors() {
    let err = AgentConfig::from_toml_str("danger_radius = \"far\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
