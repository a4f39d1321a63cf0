use super::*;

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "catshare_settings_{name}_{}_{}.json",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn defaults_match_app_defaults() {
    let w = WatermarkConfig::default();
    assert!(w.enabled);
    assert_eq!(w.text, "created using CatShare");
    assert!(w.is_visible());
    assert!(!WatermarkConfig::disabled().is_visible());
}

#[test]
fn parse_settings_applies_defaults_per_key() {
    assert_eq!(parse_settings("{}").unwrap(), WatermarkConfig::default());

    let w = parse_settings(r#"{"showWatermark": false}"#).unwrap();
    assert!(!w.enabled);
    assert_eq!(w.text, DEFAULT_WATERMARK_TEXT);

    let w = parse_settings(r#"{"watermarkText": "My Shop", "other": 1}"#).unwrap();
    assert!(w.enabled);
    assert_eq!(w.text, "My Shop");

    assert!(matches!(
        parse_settings("not json"),
        Err(CardError::Settings(_))
    ));
}

#[test]
fn json_file_settings_are_reread_on_every_call() {
    let path = temp_file("reread");
    let settings = JsonFileSettings::new(&path);

    assert_eq!(settings.watermark().unwrap(), WatermarkConfig::default());

    std::fs::write(&path, r#"{"showWatermark": false}"#).unwrap();
    assert!(!settings.watermark().unwrap().enabled);

    std::fs::write(&path, r#"{"showWatermark": true, "watermarkText": "x"}"#).unwrap();
    let w = settings.watermark().unwrap();
    assert!(w.enabled);
    assert_eq!(w.text, "x");

    std::fs::remove_file(&path).ok();
}

#[test]
fn memory_settings_setters_take_effect_immediately() {
    let settings = MemorySettings::default();
    assert!(settings.watermark().unwrap().enabled);
    settings.set_enabled(false);
    assert!(!settings.watermark().unwrap().enabled);
    settings.set_text("Hello");
    assert_eq!(settings.watermark().unwrap().text, "Hello");
}

#[test]
fn watermark_position_parses_leniently() {
    assert_eq!(WatermarkPosition::default(), WatermarkPosition::BottomCenter);
    assert_eq!(WatermarkPosition::parse("top-left"), WatermarkPosition::TopLeft);
    assert_eq!(WatermarkPosition::parse("middle_right"), WatermarkPosition::MiddleRight);
    assert_eq!(WatermarkPosition::parse("bottomLeft"), WatermarkPosition::BottomLeft);
    assert_eq!(WatermarkPosition::parse("\"top-center\""), WatermarkPosition::TopCenter);
    assert_eq!(WatermarkPosition::parse("MIDDLE-CENTER"), WatermarkPosition::MiddleCenter);
    assert_eq!(WatermarkPosition::parse("sideways"), WatermarkPosition::BottomCenter);
    assert_eq!(WatermarkPosition::parse(""), WatermarkPosition::BottomCenter);
}

#[test]
fn watermark_position_is_read_from_settings() {
    assert_eq!(
        parse_settings("{}").unwrap().position,
        WatermarkPosition::BottomCenter
    );
    let w = parse_settings(r#"{"watermarkPosition": "top-right"}"#).unwrap();
    assert_eq!(w.position, WatermarkPosition::TopRight);

    let settings = MemorySettings::default();
    settings.set_position(WatermarkPosition::MiddleLeft);
    assert_eq!(
        settings.watermark().unwrap().position,
        WatermarkPosition::MiddleLeft
    );
}
