use vaani::infrastructure::observability::TracingConfig;

#[test]
fn given_default_config_when_created_then_environment_is_set() {
    let config = TracingConfig::default();
    assert!(!config.environment.is_empty());
}

#[test]
fn given_default_config_when_created_then_filter_targets_service() {
    let config = TracingConfig::default();
    assert_eq!(config.default_filter, "info,vaani=debug,tower_http=debug");
}

#[test]
fn given_level_when_overriding_then_filter_uses_level() {
    let config = TracingConfig::default().with_level("warn");
    assert_eq!(config.default_filter, "warn,vaani=debug,tower_http=debug");
}
