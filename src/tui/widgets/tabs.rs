use ratatui::widgets::Tabs;
use ratatui::style::{Style, Modifier};
use ratatui::text::{Line, Span};
use ratatui::Frame;
use ratatui::layout::Rect;
use crate::tui::app::Tab;
use crate::Config;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};

pub fn render_tabs(f: &mut Frame, area: Rect, current_tab: Tab, window_days: i64, config: &Config) {
    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let tab_bg = parse_color(&active_theme.tab_bg);

    // Use contrast-aware text color for non-selected tabs based on tab_bg
    // This ensures good readability regardless of terminal's gray rendering
    let tab_fg = get_contrast_text_color(tab_bg);

    // The dashboard tab carries its active window in the label
    let labels = [
        format!("Upcoming ({}d)", window_days),
        "Contacts".to_string(),
        "Gifts".to_string(),
    ];

    // Each tab renders as a box: background color with padding on both sides
    let titles: Vec<Line> = labels
        .iter()
        .map(|label| {
            Line::from(vec![
                Span::styled("  ", Style::default().bg(tab_bg)),
                Span::styled(label.clone(), Style::default().fg(tab_fg).bg(tab_bg)),
                Span::styled("  ", Style::default().bg(tab_bg)),
            ])
        })
        .collect();

    let tab_index = match current_tab {
        Tab::Upcoming => 0,
        Tab::Contacts => 1,
        Tab::Gifts => 2,
    };

    let highlight_fg = get_contrast_text_color(highlight_bg);

    let tabs = Tabs::new(titles)
        .select(tab_index)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD)
        )
        .divider("  ") // Space between tab boxes
        .padding("", "");

    f.render_widget(tabs, area);
}
