//! Integration tests for the rich-text facade, plus property tests over
//! randomly generated markup.

use cardgen_markup::{
    ColorRegistry, FixedFontMetrics, FontResolver, LayoutOptions, MarkupError, Point, Rect,
    RichText, Style, TextLayout, typeset,
};
use quickcheck_macros::quickcheck;

fn setup() -> (FixedFontMetrics, Style) {
    let mut fonts = FixedFontMetrics::with_font("base");
    let style = Style::with_initial_font(fonts.resolve("base").unwrap());
    (fonts, style)
}

#[test]
fn test_with_source_lays_out() {
    let (mut fonts, style) = setup();
    let text = RichText::with_source("ab\nc", 20, style, &ColorRegistry::new(), &mut fonts).unwrap();
    assert_eq!(text.source(), "ab\nc");
    assert_eq!(text.character_size(), 20);
    assert_eq!(text.runs().len(), 2);
    assert_eq!(text.local_bounds(), Rect::new(0.0, 0.0, 20.0, 50.0));
}

#[test]
fn test_set_character_size_relayouts_and_clamps() {
    let (mut fonts, style) = setup();
    let colors = ColorRegistry::new();
    let mut text = RichText::with_source("abcd", 20, style, &colors, &mut fonts).unwrap();
    text.set_character_size(40, &colors, &mut fonts).unwrap();
    assert_eq!(text.local_bounds().width, 80.0);
    text.set_character_size(0, &colors, &mut fonts).unwrap();
    assert_eq!(text.character_size(), 1);
    assert_eq!(text.local_bounds().width, 2.0);
}

#[test]
fn test_failed_source_leaves_block_cleared() {
    let (mut fonts, style) = setup();
    let colors = ColorRegistry::new();
    let mut text = RichText::with_source("ok", 20, style, &colors, &mut fonts).unwrap();
    let result = text.set_source("[bogus]", &colors, &mut fonts);
    assert!(matches!(result, Err(MarkupError::UnknownTag { .. })));
    assert_eq!(text.source(), "[bogus]");
    assert!(text.runs().is_empty());
    assert_eq!(text.local_bounds(), Rect::default());
    assert_eq!(text.plain_text(), "");
}

#[test]
fn test_plain_text_strips_markup() {
    let (mut fonts, style) = setup();
    let source = "*a*b[fill-color red]\n[align right]\\*c/d/\n";
    let text = RichText::with_source(source, 20, style, &ColorRegistry::new(), &mut fonts).unwrap();
    assert_eq!(text.plain_text(), "ab\n*cd\n");
}

#[test]
fn test_builders_take_effect_on_first_layout() {
    let (mut fonts, style) = setup();
    let mut text = RichText::new(style)
        .with_character_size(0)
        .with_available_width(Some(10.0));
    assert_eq!(text.character_size(), 1);
    assert_eq!(text.available_width(), Some(10.0));
    text.set_source("[align right]ab", &ColorRegistry::new(), &mut fonts)
        .unwrap();
    assert_eq!(text.runs()[0].origin, Point::new(9.0, 0.0));
}

#[test]
fn test_each_layout_starts_from_base_style() {
    let (mut fonts, style) = setup();
    let colors = ColorRegistry::new();
    let mut text = RichText::with_source("*open", 20, style, &colors, &mut fonts).unwrap();
    text.set_source("plain", &colors, &mut fonts).unwrap();
    assert!(!text.runs()[0].run.style.bold);
}

#[test]
fn test_global_bounds() {
    let (mut fonts, style) = setup();
    let text = RichText::with_source("abcd", 20, style, &ColorRegistry::new(), &mut fonts).unwrap();
    let bounds = text.global_bounds(Point::new(100.0, 50.0), Point::new(20.0, 12.0));
    assert_eq!(bounds, Rect::new(80.0, 38.0, 40.0, 25.0));
}

#[test]
fn test_clear_keeps_source() {
    let (mut fonts, style) = setup();
    let mut text = RichText::with_source("abc", 20, style, &ColorRegistry::new(), &mut fonts).unwrap();
    text.clear();
    assert_eq!(text.source(), "abc");
    assert!(text.runs().is_empty());
}

#[test]
fn test_available_width_applies_on_next_layout() {
    let (mut fonts, style) = setup();
    let colors = ColorRegistry::new();
    let mut text = RichText::with_source("[align right]ab", 20, style, &colors, &mut fonts).unwrap();
    assert_eq!(text.runs()[0].origin.x, 0.0);
    text.set_available_width(Some(60.0));
    text.set_character_size(20, &colors, &mut fonts).unwrap();
    assert_eq!(text.runs()[0].origin.x, 40.0);
}

/// Map arbitrary bytes onto an alphabet of text and control characters that
/// always forms valid markup.
fn markup_from(bytes: &[u8]) -> String {
    const ALPHABET: [&str; 12] = [
        "a", "b", " ", "*", "/", "_", "~", "\n", "\\*", "\\[", "[fill-color red]", "[align center]",
    ];
    bytes
        .iter()
        .map(|&b| ALPHABET[usize::from(b) % ALPHABET.len()])
        .collect()
}

fn typeset_markup(source: &str) -> TextLayout {
    let (mut fonts, mut style) = setup();
    typeset(
        source,
        &mut style,
        &ColorRegistry::new(),
        &mut fonts,
        &LayoutOptions::new(20.0),
    )
    .unwrap()
}

#[quickcheck]
fn prop_typesetting_is_deterministic(bytes: Vec<u8>) -> bool {
    let source = markup_from(&bytes);
    typeset_markup(&source) == typeset_markup(&source)
}

#[quickcheck]
fn prop_leading_double_toggle_is_invisible(bytes: Vec<u8>, which: u8) -> bool {
    let toggle = ["**", "//", "__", "~~"][usize::from(which) % 4];
    let source = markup_from(&bytes);
    typeset_markup(&format!("{toggle}{source}")) == typeset_markup(&source)
}

#[quickcheck]
fn prop_bounds_contain_every_origin(bytes: Vec<u8>) -> bool {
    let layout = typeset_markup(&markup_from(&bytes));
    layout.runs.iter().all(|run| {
        run.origin.x <= layout.bounds.right() && run.origin.y <= layout.bounds.bottom()
    })
}
