use super::*;

fn valid() -> RainConfig {
    RainConfig {
        container_id: Some("canvas".to_string()),
        char_size: 12.0,
        padding: 7.0,
        width: 100,
        height: 80,
        highlight_lead: true,
    }
}

#[test]
fn missing_container_id_is_fatal() {
    let mut cfg = valid();
    cfg.container_id = None;
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, GlyphfallError::Config(_)));
    assert!(err.to_string().contains("containerId"));

    cfg.container_id = Some("   ".to_string());
    assert!(cfg.validate().is_err());
    assert!(cfg.container_id().is_err());
}

#[test]
fn validate_rejects_bad_geometry() {
    let mut cfg = valid();
    cfg.char_size = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = valid();
    cfg.char_size = f64::NAN;
    assert!(cfg.validate().is_err());

    let mut cfg = valid();
    cfg.padding = -1.0;
    assert!(cfg.validate().is_err());

    let mut cfg = valid();
    cfg.height = 0;
    assert!(cfg.validate().is_err());

    assert!(valid().validate().is_ok());
}

#[test]
fn column_count_and_offsets_follow_slot_width() {
    let m = valid().metrics();
    assert_eq!(m.column_count(), 5);
    let offsets: Vec<f64> = (0..m.column_count()).map(|i| m.slot_x(i)).collect();
    assert_eq!(offsets, vec![0.0, 19.0, 38.0, 57.0, 76.0]);
}

#[test]
fn completion_threshold_is_height_plus_cell() {
    let m = valid().metrics();
    assert_eq!(m.completion_threshold(), 92.0);
    assert_eq!(m.with_size(100, 200).completion_threshold(), 212.0);
}

#[test]
fn json_accepts_camel_case_option_names() {
    let cfg = RainConfig::from_json(
        r#"{ "containerId": "canvas", "charSize": 12, "padding": 7, "width": 640, "height": 360 }"#,
    )
    .unwrap();
    assert_eq!(cfg.container_id.as_deref(), Some("canvas"));
    assert_eq!(cfg.char_size, 12.0);
    assert_eq!(cfg.width, 640);
    assert!(cfg.highlight_lead);
    assert!(cfg.validate().is_ok());
}

#[test]
fn json_defaults_fill_missing_fields() {
    let cfg = RainConfig::from_json(r#"{ "container_id": "x" }"#).unwrap();
    assert_eq!(cfg.char_size, 80.0);
    assert_eq!(cfg.padding, 6.0);

    assert!(matches!(
        RainConfig::from_json("{ nope"),
        Err(GlyphfallError::Config(_))
    ));
}
