use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GlyphfallError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        GlyphfallError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        GlyphfallError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GlyphfallError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
