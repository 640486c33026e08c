//! Loading cursor configuration from TOML and JSON files.

use std::io::Write;

use trail_core::{ConfigError, CursorConfig, Easing, Radius};

// ── TOML ────────────────────────────────────────────────────────────────

#[test]
fn empty_toml_yields_kit_defaults() {
    let config = CursorConfig::from_toml_str("").unwrap();
    assert_eq!(config, CursorConfig::kit());
}

#[test]
fn partial_toml_overrides_only_named_fields() {
    let config = CursorConfig::from_toml_str(
        r##"
trailing_speed = 6
outer_size = 40
show_system_cursor = true

[outer_style]
border_color = "#00aaff"
radius = { pixels = 4 }

[hover]
size_offset = 16
easing = "ease-out"
"##,
    )
    .unwrap();

    assert_eq!(config.trailing_speed, 6.0);
    assert_eq!(config.outer_size, 40.0);
    assert!(config.show_system_cursor);
    assert_eq!(config.inner_size, 7.0);
    assert_eq!(config.outer_style.border_color, "#00aaff");
    assert_eq!(config.outer_style.radius, Radius::Pixels(4.0));

    let hover = config.hover.expect("hover table present");
    assert_eq!(hover.size_offset, 16.0);
    assert_eq!(hover.opacity_boost, 0.2);
    assert_eq!(hover.transition_ms, 200);
    assert_eq!(hover.easing, Easing::EaseOut);

    let settings = config.validate().unwrap();
    assert_eq!(settings.trailing_speed().get(), 6.0);
}

#[test]
fn toml_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "trailing_speed = 3\nclickables = [\"a\", \".cta\"]").unwrap();

    let config = CursorConfig::from_toml_file(file.path()).unwrap();
    let settings = config.validate().unwrap();
    assert_eq!(settings.clickables().len(), 2);
    assert_eq!(settings.clickables().to_string(), "a, .cta");
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = CursorConfig::from_toml_str("trailing_speed = \"fast\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn loaded_speed_below_one_fails_validation() {
    let config = CursorConfig::from_toml_str("trailing_speed = 0.5").unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::TrailingSpeed { .. })
    ));
}

// ── JSON ────────────────────────────────────────────────────────────────

#[test]
fn json_follow_like_config() {
    let config = CursorConfig::from_json_str(
        r##"{
            "trailing_speed": 4,
            "desktop_only": false,
            "activate_on_mount": true,
            "inner_style": { "color": "#FF2D00" }
        }"##,
    )
    .unwrap();
    assert!(config.activate_on_mount);
    assert!(!config.desktop_only);
    assert_eq!(config.inner_style.color, "#FF2D00");
    assert_eq!(config.inner_style.border_width, 0.0);
}

#[test]
fn json_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let original = CursorConfig::follow();
    file.write_all(serde_json::to_string(&original).unwrap().as_bytes())
        .unwrap();

    let loaded = CursorConfig::from_json_file(file.path()).unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CursorConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
