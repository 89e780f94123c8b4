use std::str::FromStr;

use coolor::{AnsiColor, Rgb};
use ratatui::style::Color;

/// Parses a color name or `#rgb`/`#rrggbb` hex code, falling back to `fallback`.
#[must_use]
pub fn parse_color(s: &str, fallback: Color) -> Color {
    let s = s.trim();

    if s.starts_with('#')
        && let Some((r, g, b)) = parse_hex_color(s)
    {
        return Color::Rgb(r, g, b);
    }

    Color::from_str(s).unwrap_or(fallback)
}

fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let s = s.trim_start_matches('#');

    if !s.is_ascii() {
        return None;
    }

    match s.len() {
        6 => Some((
            u8::from_str_radix(&s[0..2], 16).ok()?,
            u8::from_str_radix(&s[2..4], 16).ok()?,
            u8::from_str_radix(&s[4..6], 16).ok()?,
        )),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&s[i..=i], 16).ok().map(|v| v * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

/// Approximate RGB value of a terminal color.
///
/// Named and indexed colors use the xterm palette; `Reset` and other
/// terminal-defined colors count as white.
#[must_use]
pub fn to_rgb(color: Color) -> Rgb {
    let code = match color {
        Color::Rgb(r, g, b) => return Rgb::new(r, g, b),
        Color::Indexed(i) => i,
        Color::Black => 0,
        Color::Red => 1,
        Color::Green => 2,
        Color::Yellow => 3,
        Color::Blue => 4,
        Color::Magenta => 5,
        Color::Cyan => 6,
        Color::Gray => 7,
        Color::DarkGray => 8,
        Color::LightRed => 9,
        Color::LightGreen => 10,
        Color::LightYellow => 11,
        Color::LightBlue => 12,
        Color::LightMagenta => 13,
        Color::LightCyan => 14,
        _ => 15,
    };

    AnsiColor::new(code).to_rgb()
}

/// Draws `color` at `opacity` over `background`.
///
/// Terminals have no alpha channel, so the result is the blended opaque color.
#[must_use]
pub fn change_opacity(color: Color, opacity: f32, background: Color) -> Color {
    let opacity = opacity.clamp(0.0, 1.0);
    let mixed = Rgb::mix(to_rgb(color), opacity, to_rgb(background), 1.0 - opacity);
    Color::Rgb(mixed.r, mixed.g, mixed.b)
}
