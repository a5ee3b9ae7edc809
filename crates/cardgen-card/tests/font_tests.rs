//! Measuring and drawing text with a real font.
//!
//! Each test looks for a common system font first and returns early when
//! none is installed.

use std::path::Path;

use cardgen_card::font_metrics::{
    bold_offset, decoration_thickness, strikethrough_offset, underline_offset,
};
use cardgen_card::{Canvas, Card, CardRenderer, FontLibrary, PlacedText};
use cardgen_markup::{
    Color, ColorRegistry, FontMeasurer, FontRef, FontResolver, Point, Rect, RichText, Style,
    Toggle,
};

/// Common system font paths for a regular sans-serif face.
const FONT_SEARCH_PATHS: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // macOS
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

const SIZE: f32 = 30.0;

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

fn system_font() -> Option<&'static str> {
    let found = FONT_SEARCH_PATHS
        .iter()
        .copied()
        .find(|path| Path::new(path).exists());
    if found.is_none() {
        eprintln!("no system font found, skipping");
    }
    found
}

fn load(path: &str) -> (FontLibrary, FontRef) {
    let mut library = FontLibrary::default();
    let font = library.resolve(path).unwrap();
    (library, font)
}

fn bold() -> Style {
    Style::new().toggled(Toggle::Bold)
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

/// Render `markup` as the only element of a 300×200 card, anchored at
/// (30, 20).
fn render(font: &str, markup: &str, size: u32) -> (Canvas, PlacedText) {
    let json = format!(
        r#"{{ "size": [300, 200], "elements": [
            {{ "pos": [0.1, 0.1], "text": {{ "markup": {}, "font": {}, "size": {size} }} }}
        ] }}"#,
        serde_json::to_string(markup).unwrap(),
        serde_json::to_string(font).unwrap(),
    );
    let card = Card::from_json(&json).unwrap();
    let (canvas, mut placed) = CardRenderer::default().render_with_layout(&card).unwrap();
    assert_eq!(placed.len(), 1);
    (canvas, placed.remove(0))
}

/// Every pixel that differs from the background, in scan order.
fn ink(canvas: &Canvas) -> Vec<(u32, u32, [u8; 4])> {
    let mut pixels = Vec::new();
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            match canvas.pixel(x, y) {
                Some(px) if px != BACKGROUND => pixels.push((x, y, px)),
                _ => {}
            }
        }
    }
    pixels
}

/// `(min_x, min_y, max_x, max_y)` of the inked pixels.
fn extent(pixels: &[(u32, u32, [u8; 4])]) -> (u32, u32, u32, u32) {
    pixels.iter().fold(
        (u32::MAX, u32::MAX, 0, 0),
        |(x0, y0, x1, y1), &(x, y, _)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
    )
}

#[test]
fn test_advance_is_additive_in_start_x() {
    let Some(path) = system_font() else { return };
    let (library, font) = load(path);
    for style in [Style::new(), bold()] {
        let from_zero = library.advance(&font, SIZE, &style, "ab", 0.0);
        let from_seven = library.advance(&font, SIZE, &style, "ab", 7.0);
        assert!(from_zero > 0.0);
        assert_close(from_seven - from_zero, 7.0);
    }
}

#[test]
fn test_line_metrics_are_plausible() {
    let Some(path) = system_font() else { return };
    let (library, font) = load(path);
    let ascent = library.ascent(&font, SIZE);
    assert!(ascent > 0.0 && ascent <= SIZE * 1.2);
    assert!(library.line_spacing(&font, SIZE) > ascent);
    assert_eq!(library.text_bounds(&font, SIZE, &Style::new(), ""), Rect::default());
    assert_eq!(library.text_bounds(&font, SIZE, &Style::new(), "   "), Rect::default());
}

#[test]
fn test_bold_widens_advance_and_bounds() {
    let Some(path) = system_font() else { return };
    let (library, font) = load(path);
    let regular = library.advance(&font, SIZE, &Style::new(), "ab", 0.0);
    let heavy = library.advance(&font, SIZE, &bold(), "ab", 0.0);
    assert_close(heavy - regular, 2.0 * bold_offset(SIZE));

    let plain = library.text_bounds(&font, SIZE, &Style::new(), "ab");
    let thick = library.text_bounds(&font, SIZE, &bold(), "ab");
    assert!(thick.right() > plain.right() + bold_offset(SIZE));
    assert_close(thick.left, plain.left);
    assert_close(thick.top, plain.top);
    assert_close(thick.height, plain.height);
}

#[test]
fn test_italic_leans_bounds_both_ways() {
    let Some(path) = system_font() else { return };
    let (library, font) = load(path);
    let italic = Style::new().toggled(Toggle::Italic);

    let upright = library.text_bounds(&font, SIZE, &Style::new(), "H");
    let leaning = library.text_bounds(&font, SIZE, &italic, "H");
    assert!(leaning.right() > upright.right());
    assert!(leaning.left <= upright.left && leaning.left > upright.left - 1.0);

    // Descenders shear to the left of their upright position.
    let upright = library.text_bounds(&font, SIZE, &Style::new(), "g");
    let leaning = library.text_bounds(&font, SIZE, &italic, "g");
    assert!(leaning.left < upright.left);
}

#[test]
fn test_outline_inflates_bounds() {
    let Some(path) = system_font() else { return };
    let (library, font) = load(path);
    let plain = library.text_bounds(&font, SIZE, &Style::new(), "Q");
    let outlined = library.text_bounds(
        &font,
        SIZE,
        &Style::new().with_outline_thickness(3.0),
        "Q",
    );
    assert_close(outlined.left, plain.left - 3.0);
    assert_close(outlined.top, plain.top - 3.0);
    assert_close(outlined.width, plain.width + 6.0);
    assert_close(outlined.height, plain.height + 6.0);
}

#[test]
fn test_decorations_extend_bounds() {
    let Some(path) = system_font() else { return };
    let (library, font) = load(path);
    let baseline = library.ascent(&font, SIZE);
    let plain = library.text_bounds(&font, SIZE, &Style::new(), "ab");
    let advance = library.advance(&font, SIZE, &Style::new(), "ab", 0.0);

    let underlined = library.text_bounds(
        &font,
        SIZE,
        &Style::new().toggled(Toggle::Underline),
        "ab",
    );
    assert_close(
        underlined.bottom(),
        baseline + underline_offset(SIZE) + decoration_thickness(SIZE),
    );
    assert!(underlined.bottom() > plain.bottom());
    assert!(underlined.left <= 0.0 && underlined.right() >= advance);

    let struck = library.text_bounds(
        &font,
        SIZE,
        &Style::new().toggled(Toggle::Strikethrough),
        "ab",
    );
    assert!(struck.top <= plain.top && struck.bottom() >= plain.bottom());
    assert!(struck.top <= baseline - strikethrough_offset(SIZE));
}

#[test]
#[allow(clippy::cast_precision_loss)]
fn test_ink_stays_inside_layout_bounds() {
    let Some(path) = system_font() else { return };
    let markup = "/gjy/ *W*\n_x_ [outline-thickness 3][outline-color red]Q";
    let (canvas, placed) = render(path, markup, 30);
    assert_eq!(placed.offset, Point::new(30.0, 20.0));

    let bounds = placed.layout.bounds.translated(placed.offset);
    let pixels = ink(&canvas);
    assert!(!pixels.is_empty());
    for &(x, y, _) in &pixels {
        let (x, y) = (x as f32, y as f32);
        assert!(
            x >= bounds.left - 1.0 && x < bounds.right() + 1.0,
            "column {x} outside {bounds:?}"
        );
        assert!(
            y >= bounds.top - 1.0 && y < bounds.bottom() + 1.0,
            "row {y} outside {bounds:?}"
        );
    }
    assert!(pixels.iter().any(|&(_, _, px)| px == [255, 0, 0, 255]));
}

#[test]
fn test_bold_and_underline_add_ink() {
    let Some(path) = system_font() else { return };
    let plain = ink(&render(path, "ab", 30).0);
    let heavy = ink(&render(path, "*ab*", 30).0);
    let underlined = ink(&render(path, "_ab_", 30).0);

    assert!(heavy.len() > plain.len());
    assert!(extent(&heavy).2 > extent(&plain).2);
    assert!(underlined.len() > plain.len());
    assert!(extent(&underlined).3 > extent(&plain).3);
}

#[test]
fn test_outline_surrounds_fill() {
    let Some(path) = system_font() else { return };
    let plain = ink(&render(path, "o", 60).0);
    let outlined = ink(&render(path, "[outline-thickness 2][outline-color red]o", 60).0);

    let (px0, py0, px1, py1) = extent(&plain);
    let (ox0, oy0, ox1, oy1) = extent(&outlined);
    assert!(ox0 + 2 <= px0 && oy0 + 2 <= py0);
    assert!(ox1 >= px1 + 2 && oy1 >= py1 + 2);
    assert!(outlined.iter().any(|&(_, _, px)| px == [255, 0, 0, 255]));
    assert!(outlined.iter().any(|&(_, _, px)| px == [255, 255, 255, 255]));
}

#[test]
fn test_draw_text_follows_offset() {
    let Some(path) = system_font() else { return };
    let mut library = FontLibrary::default();
    let style = Style::with_initial_font(library.resolve(path).unwrap());
    let rich = RichText::with_source("Hi", 30, style, &ColorRegistry::new(), &mut library).unwrap();

    let mut near = Canvas::new(100, 60, Color::BLACK);
    near.draw_text(rich.layout(), Point::new(0.0, 0.0), SIZE, &library);
    let mut far = Canvas::new(100, 60, Color::BLACK);
    far.draw_text(rich.layout(), Point::new(10.0, 5.0), SIZE, &library);

    let near = ink(&near);
    let far = ink(&far);
    assert!(!near.is_empty());
    assert_eq!(near.len(), far.len());
    for (a, b) in near.iter().zip(&far) {
        assert_eq!((a.0 + 10, a.1 + 5, a.2), *b);
    }
}
