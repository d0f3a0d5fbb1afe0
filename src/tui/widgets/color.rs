use ratatui::style::Color;

/// Parse a color string into a ratatui Color
/// Supports:
/// - Named colors: black, red, green, yellow, blue, magenta, cyan, white, gray/grey
/// - Extended named colors: darkgray, lightred, lightgreen, lightyellow, lightblue, lightmagenta, lightcyan
/// - Hex format: #RRGGBB or #RGB (short form)
/// - RGB format: rgb(255,0,0) or rgb(255, 0, 0) (with spaces)
/// Returns Color::White as default for unrecognized colors
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();

    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "lightgray" | "lightgrey" => Color::Gray, // LightGray not available, use Gray
        _ => {
            if s.starts_with('#') {
                if let Some(color) = parse_hex_color(&s) {
                    return color;
                }
            } else if s.starts_with("rgb(") {
                if let Some(color) = parse_rgb_color(&s) {
                    return color;
                }
            }
            Color::White
        }
    }
}

/// Parse hex color format (#RRGGBB or #RGB)
fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim_start_matches('#');

    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if hex.len() == 3 {
        // Short form: expand each nibble, 0xF -> 0xFF
        let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
        let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
        let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
        Some(Color::Rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
    } else {
        None
    }
}

/// Parse RGB color format (rgb(r,g,b) or rgb(r, g, b))
fn parse_rgb_color(s: &str) -> Option<Color> {
    let content = s.strip_prefix("rgb(")?.strip_suffix(')')?;

    let parts: Vec<&str> = content.split(',').map(|s| s.trim()).collect();
    if parts.len() != 3 {
        return None;
    }

    let r = parts[0].parse::<u8>().ok()?;
    let g = parts[1].parse::<u8>().ok()?;
    let b = parts[2].parse::<u8>().ok()?;

    Some(Color::Rgb(r, g, b))
}

/// Format a Color back to a config-file string
pub fn format_color_for_display(color: &Color) -> String {
    match color {
        Color::Black => "black".to_string(),
        Color::Red => "red".to_string(),
        Color::Green => "green".to_string(),
        Color::Yellow => "yellow".to_string(),
        Color::Blue => "blue".to_string(),
        Color::Magenta => "magenta".to_string(),
        Color::Cyan => "cyan".to_string(),
        Color::White => "white".to_string(),
        Color::Gray => "gray".to_string(),
        Color::DarkGray => "darkgray".to_string(),
        Color::LightRed => "lightred".to_string(),
        Color::LightGreen => "lightgreen".to_string(),
        Color::LightYellow => "lightyellow".to_string(),
        Color::LightBlue => "lightblue".to_string(),
        Color::LightMagenta => "lightmagenta".to_string(),
        Color::LightCyan => "lightcyan".to_string(),
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Indexed(_) => "indexed".to_string(),
        Color::Reset => "reset".to_string(),
    }
}

/// Relative luminance (WCAG formula), 0.0 dark to 1.0 light
fn calculate_luminance(color: Color) -> f64 {
    let (r, g, b) = match color {
        Color::Rgb(r, g, b) => (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0),
        // Approximate RGB values for named colors
        Color::Black => (0.0, 0.0, 0.0),
        Color::Red => (1.0, 0.0, 0.0),
        Color::Green => (0.0, 1.0, 0.0),
        Color::Yellow => (1.0, 1.0, 0.0),
        Color::Blue => (0.0, 0.0, 1.0),
        Color::Magenta => (1.0, 0.0, 1.0),
        Color::Cyan => (0.0, 1.0, 1.0),
        Color::White => (1.0, 1.0, 1.0),
        Color::Gray => (0.5, 0.5, 0.5),
        Color::DarkGray => (0.25, 0.25, 0.25),
        Color::LightRed => (1.0, 0.5, 0.5),
        Color::LightGreen => (0.5, 1.0, 0.5),
        Color::LightYellow => (1.0, 1.0, 0.5),
        Color::LightBlue => (0.5, 0.5, 1.0),
        Color::LightMagenta => (1.0, 0.5, 1.0),
        Color::LightCyan => (0.5, 1.0, 1.0),
        Color::Indexed(_) | Color::Reset => (0.5, 0.5, 0.5),
    };

    let linear = |c: f64| {
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };

    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Named colors most terminals render dark enough to need light text
fn is_dark_color(color: Color) -> bool {
    matches!(
        color,
        Color::Black | Color::Blue | Color::Magenta | Color::Red
    )
}

/// Get an appropriate foreground color for text on a given background color.
/// Returns black for light backgrounds, white for dark backgrounds.
/// Uses luminance calculation for RGB colors, a heuristic for named colors.
pub fn get_contrast_text_color(background: Color) -> Color {
    if matches!(background, Color::Rgb(_, _, _)) {
        if calculate_luminance(background) < 0.5 {
            Color::White
        } else {
            Color::Black
        }
    } else if is_dark_color(background) {
        Color::White
    } else {
        Color::Black
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color("red"), Color::Red);
        assert_eq!(parse_color(" Blue "), Color::Blue);
        assert_eq!(parse_color("grey"), Color::Gray);
        assert_eq!(parse_color("nonsense"), Color::White);
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color("#FF0000"), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color("#f00"), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color("#zzz"), Color::White);
    }

    #[test]
    fn test_parse_rgb_colors() {
        assert_eq!(parse_color("rgb(1, 2, 3)"), Color::Rgb(1, 2, 3));
        assert_eq!(parse_color("rgb(300,0,0)"), Color::White);
    }

    #[test]
    fn test_contrast_text_color() {
        assert_eq!(get_contrast_text_color(Color::Black), Color::White);
        assert_eq!(get_contrast_text_color(Color::Yellow), Color::Black);
        assert_eq!(get_contrast_text_color(Color::Rgb(10, 10, 10)), Color::White);
        assert_eq!(
            get_contrast_text_color(Color::Rgb(240, 240, 240)),
            Color::Black
        );
    }

    #[test]
    fn test_color_round_trips_through_display() {
        for name in ["red", "lightcyan", "darkgray"] {
            let color = parse_color(name);
            assert_eq!(format_color_for_display(&color), name);
        }
        assert_eq!(
            format_color_for_display(&Color::Rgb(18, 52, 86)),
            "#123456"
        );
    }
}
