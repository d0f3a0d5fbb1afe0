use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::style::{Style, Modifier};
use ratatui::text::{Line, Span, Text};
use ratatui::Frame;
use ratatui::layout::{Rect, Layout, Constraint, Flex};
use crate::tui::app::App;
use crate::tui::widgets::color::parse_color;

/// First-run prompt asking for the user's name. Blocks the rest of the
/// UI until a profile exists.
pub fn render_setup(f: &mut Frame, area: Rect, app: &App) {
    let popup = popup_area(area, 50, 30);

    let active_theme = app.config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let name = app.setup_name.contents();
    let lines = vec![
        Line::from(Span::styled(
            "Welcome to bdg!",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("What should we call you?"),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {} ", name),
            Style::default().bg(highlight_bg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to continue",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Setup"))
        .style(Style::default().fg(fg));

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);

    // Cursor sits at the end of the typed name
    let cursor_x = popup.x + 2 + name.chars().count() as u16;
    let cursor_y = popup.y + 5;
    if cursor_x < popup.x + popup.width.saturating_sub(1) && cursor_y < popup.y + popup.height {
        f.set_cursor_position((cursor_x, cursor_y));
    }
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
