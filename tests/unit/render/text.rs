use super::*;

fn test_font() -> FontFace {
    FontFace::from_path(Path::new("tests/data/fonts/DejaVuSans.ttf")).unwrap()
}

#[test]
fn empty_book_has_no_faces() {
    let book = FontBook::empty();
    assert!(book.is_empty());
    assert!(book.face(FaceKind::Regular).is_none());
    assert!(book.face(FaceKind::Italic).is_none());
}

#[test]
fn empty_font_bytes_are_rejected() {
    assert!(FontFace::from_bytes(Vec::new()).is_err());
    assert!(FontFace::from_path(Path::new("/definitely/not/a/font.ttf")).is_err());
}

#[test]
fn italic_falls_back_to_regular() {
    let face = test_font();
    let book = FontBook::new(Some(face), None);
    let (kind, _) = book.face(FaceKind::Italic).unwrap();
    assert_eq!(kind, FaceKind::Regular);
}

#[test]
fn layout_line_is_deterministic_and_scales_with_size() {
    let face = test_font();
    let mut engine = TextLayoutEngine::new();
    let a = engine
        .layout_line("Price : 250", FaceKind::Regular, &face, 19.0, Rgba8::BLACK)
        .unwrap();
    let b = engine
        .layout_line("Price : 250", FaceKind::Regular, &face, 19.0, Rgba8::BLACK)
        .unwrap();
    let big = engine
        .layout_line("Price : 250", FaceKind::Regular, &face, 38.0, Rgba8::BLACK)
        .unwrap();
    assert!(a.width() > 0.0);
    assert_eq!(a.width(), b.width());
    assert!(big.width() > a.width());
    assert_eq!(a.lines().count(), 1);

    assert!(
        engine
            .layout_line("x", FaceKind::Regular, &face, 0.0, Rgba8::BLACK)
            .is_err()
    );
}

#[test]
fn font_paths_load_both_faces() {
    let book = FontBook::from_paths(&FontPaths {
        regular: Some("tests/data/fonts/DejaVuSans.ttf".into()),
        italic: Some("tests/data/fonts/DejaVuSans-Oblique.ttf".into()),
    })
    .unwrap();
    assert!(!book.is_empty());
    let (kind, italic) = book.face(FaceKind::Italic).unwrap();
    assert_eq!(kind, FaceKind::Italic);
    let (_, regular) = book.face(FaceKind::Regular).unwrap();
    assert_ne!(italic.bytes(), regular.bytes());
}
