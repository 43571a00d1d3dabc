use std::path::PathBuf;
use std::time::Duration;

use vaani::presentation::{Environment, Settings};

#[test]
fn given_no_settings_file_when_loading_then_uses_defaults() {
    let dir = tempfile::TempDir::new().unwrap();

    let settings = Settings::load_from(dir.path(), Environment::Test).unwrap();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.server.max_upload_bytes(), 20 * 1024 * 1024);
    assert_eq!(settings.storage.upload_dir, PathBuf::from("uploads"));
    assert_eq!(settings.storage.audio_dir, PathBuf::from("audio/output"));
    assert_eq!(settings.ocr.tesseract_binary, PathBuf::from("tesseract"));
    assert_eq!(settings.speech.tld, "com");
    assert!(settings.retention.max_age().is_none());
}

#[test]
fn given_environment_settings_file_when_loading_then_file_overrides_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("appsettings.test.toml"),
        r#"
[server]
port = 9100

[speech]
tld = "co.in"

[retention]
max_age_hours = 24
"#,
    )
    .unwrap();

    let settings = Settings::load_from(dir.path(), Environment::Test).unwrap();

    assert_eq!(settings.server.port, 9100);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.speech.tld, "co.in");
    assert_eq!(
        settings.retention.max_age(),
        Some(Duration::from_secs(24 * 3600))
    );
}

#[test]
fn given_default_server_settings_when_building_address_then_binds_all_interfaces() {
    let dir = tempfile::TempDir::new().unwrap();

    let settings = Settings::load_from(dir.path(), Environment::Local).unwrap();

    assert_eq!(settings.server.socket_addr().unwrap().to_string(), "0.0.0.0:8000");
}
