use super::*;

#[test]
fn constructors_map_to_variants() {
    assert!(matches!(CardError::validation("x"), CardError::Validation(_)));
    assert!(matches!(CardError::surface("x"), CardError::Surface(_)));
    assert!(matches!(CardError::render("x"), CardError::Render(_)));
    assert!(matches!(CardError::settings("x"), CardError::Settings(_)));
}

#[test]
fn display_prefixes_kind() {
    assert_eq!(
        CardError::validation("bad label").to_string(),
        "validation error: bad label"
    );
    assert_eq!(
        CardError::surface("no memory").to_string(),
        "surface error: no memory"
    );
}

#[test]
fn anyhow_errors_are_transparent() {
    let err: CardError = anyhow::anyhow!("disk full").into();
    assert_eq!(err.to_string(), "disk full");
}
