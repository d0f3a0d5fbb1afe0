use ratatui::widgets::Paragraph;
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::Rect;
use crate::Config;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};

/// One-line bar at the bottom: a transient status message when one is
/// set, otherwise the key hints for the current mode.
pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let max_width = area.width as usize;

    let (content, style) = match message {
        Some(msg) => {
            let msg_fg = get_contrast_text_color(highlight_bg);
            (
                truncate_with_ellipsis(msg, max_width),
                Style::default().fg(msg_fg).bg(highlight_bg).add_modifier(Modifier::BOLD),
            )
        }
        None => (
            fit_hints(key_hints, max_width),
            Style::default().fg(fg_color).bg(bg_color),
        ),
    };

    let paragraph = Paragraph::new(content).style(style);
    f.render_widget(paragraph, area);
}

/// Joins as many hints as fit with bullet separators, ending with "..."
/// when some were cut
fn fit_hints(key_hints: &[String], max_width: usize) -> String {
    let separator = " • ";
    let mut text = String::new();

    for (i, hint) in key_hints.iter().enumerate() {
        let mut candidate = text.clone();
        if i > 0 {
            candidate.push_str(separator);
        }
        candidate.push_str(hint);

        if candidate.chars().count() > max_width {
            if text.is_empty() {
                return truncate_with_ellipsis(hint, max_width);
            }
            return truncate_with_ellipsis(&format!("{}...", text), max_width);
        }
        text = candidate;
    }

    text
}

fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_width.saturating_sub(3)).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_hints_drops_overflow() {
        let hints = vec!["q: quit".to_string(), "n: new".to_string(), "e: edit".to_string()];
        let fitted = fit_hints(&hints, 18);
        assert!(fitted.starts_with("q: quit"));
        assert!(fitted.ends_with("..."));
    }

    #[test]
    fn test_fit_hints_all_fit() {
        let hints = vec!["q: quit".to_string(), "n: new".to_string()];
        assert_eq!(fit_hints(&hints, 80), "q: quit • n: new");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("a longer message", 10), "a longe...");
    }
}
