//! Color math used by the compositor: lightening, light/dark classification and paint parsing.

/// Fixed per-channel offset applied by [`lighten`].
pub const LIGHTEN_OFFSET: u8 = 40;

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub(crate) fn to_paint(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Lighten `color` by [`LIGHTEN_OFFSET`] per channel, clamped at 255.
///
/// Only `#rrggbb` and `rgb(r, g, b)` are understood; any other input is returned unchanged.
/// `rgb` components are digit runs of any magnitude (clamped after the offset) and whitespace
/// is allowed only after a comma. The result is always formatted as `rgb(r, g, b)`, so
/// lightening is re-applicable.
pub fn lighten(color: &str) -> String {
    let Some((r, g, b)) = parse_hex6(color)
        .map(|(r, g, b)| (u32::from(r), u32::from(g), u32::from(b)))
        .or_else(|| parse_rgb_digits(color))
    else {
        return color.to_string();
    };
    let up = |c: u32| c.saturating_add(u32::from(LIGHTEN_OFFSET)).min(255);
    format!("rgb({}, {}, {})", up(r), up(g), up(b))
}

/// Binary light/dark classification of a background color.
///
/// `white` in any letter case, or exactly lowercase `#ffffff`, is light; every other value
/// (including `#FFFFFF` and padded input) takes the dark-contrast branch. Not a luminance test.
pub fn is_light_background(color: &str) -> bool {
    color.eq_ignore_ascii_case("white") || color == "#ffffff"
}

/// Parse a CSS-like color for painting. Unknown input paints opaque black.
pub fn parse_paint(color: &str) -> Rgba8 {
    let s = color.trim();
    if let Some(named) = named_color(s) {
        return named;
    }
    if let Some(hex) = s.strip_prefix('#') {
        if let Some(c) = parse_hex_digits(hex) {
            return c;
        }
    }
    if let Some((r, g, b)) = parse_rgb_fn(s) {
        return Rgba8::opaque(r, g, b);
    }
    if let Some(c) = parse_rgba_fn(s) {
        return c;
    }
    Rgba8::BLACK
}

fn parse_hex6(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let c = parse_hex_digits(hex)?;
    Some((c.r, c.g, c.b))
}

fn parse_hex_digits(hex: &str) -> Option<Rgba8> {
    if !hex.is_ascii() {
        return None;
    }
    fn byte(pair: &str) -> Option<u8> {
        u8::from_str_radix(pair, 16).ok()
    }
    fn nibble(c: &str) -> Option<u8> {
        let v = u8::from_str_radix(c, 16).ok()?;
        Some(v * 17)
    }

    match hex.len() {
        3 => Some(Rgba8::opaque(
            nibble(&hex[0..1])?,
            nibble(&hex[1..2])?,
            nibble(&hex[2..3])?,
        )),
        6 => Some(Rgba8::opaque(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
        )),
        8 => Some(Rgba8 {
            r: byte(&hex[0..2])?,
            g: byte(&hex[2..4])?,
            b: byte(&hex[4..6])?,
            a: byte(&hex[6..8])?,
        }),
        _ => None,
    }
}

fn fn_args<'a>(s: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let inner = s.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.split(',').map(str::trim).collect())
}

/// Strict `rgb(R,\s*G,\s*B)` with unbounded digit runs, for [`lighten`].
fn parse_rgb_digits(s: &str) -> Option<(u32, u32, u32)> {
    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',');
    let r = digits(parts.next()?)?;
    let g = digits(parts.next()?.trim_start())?;
    let b = digits(parts.next()?.trim_start())?;
    if parts.next().is_some() {
        return None;
    }
    Some((r, g, b))
}

fn digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Digit runs past u32 still clamp to 255.
    Some(s.parse::<u32>().unwrap_or(u32::MAX))
}

fn parse_rgb_fn(s: &str) -> Option<(u8, u8, u8)> {
    let args = fn_args(s, "rgb")?;
    let [r, g, b] = args.as_slice() else {
        return None;
    };
    Some((r.parse().ok()?, g.parse().ok()?, b.parse().ok()?))
}

fn parse_rgba_fn(s: &str) -> Option<Rgba8> {
    let args = fn_args(s, "rgba")?;
    let [r, g, b, a] = args.as_slice() else {
        return None;
    };
    let a: f64 = a.parse().ok()?;
    Some(Rgba8 {
        r: r.parse().ok()?,
        g: g.parse().ok()?,
        b: b.parse().ok()?,
        a: (a.clamp(0.0, 1.0) * 255.0).round() as u8,
    })
}

fn named_color(s: &str) -> Option<Rgba8> {
    let c = match s.to_ascii_lowercase().as_str() {
        "white" => Rgba8::WHITE,
        "black" => Rgba8::BLACK,
        "red" => Rgba8::opaque(255, 0, 0),
        "green" => Rgba8::opaque(0, 128, 0),
        "blue" => Rgba8::opaque(0, 0, 255),
        "yellow" => Rgba8::opaque(255, 255, 0),
        "orange" => Rgba8::opaque(255, 165, 0),
        "purple" => Rgba8::opaque(128, 0, 128),
        "pink" => Rgba8::opaque(255, 192, 203),
        "gray" | "grey" => Rgba8::opaque(128, 128, 128),
        "lightblue" => Rgba8::opaque(173, 216, 230),
        "transparent" => Rgba8::WHITE.with_alpha(0),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
