use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::style::{Style, Modifier};
use ratatui::text::{Line, Span, Text};
use ratatui::Frame;
use ratatui::layout::Rect;
use crate::tui::app::App;
use crate::dates;
use crate::tui::widgets::color::parse_color;

/// Dashboard shown in the main pane of the Upcoming tab: birthdays today,
/// then everything else inside the active window, nearest first.
pub fn render_upcoming_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let active_theme = app.config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let upcoming = app.upcoming_contacts();
    let (today_contacts, later_contacts): (Vec<_>, Vec<_>) = upcoming
        .into_iter()
        .partition(|c| dates::days_until(c.birth_month, c.birth_day, app.today) == 0);

    let mut lines: Vec<Line> = Vec::new();

    if let Some(profile) = &app.profile {
        lines.push(Line::from(Span::styled(
            format!("Hello, {}!", profile.name),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    if !today_contacts.is_empty() {
        lines.push(Line::from(Span::styled(
            "Today",
            Style::default().fg(highlight_bg).add_modifier(Modifier::BOLD),
        )));
        for contact in &today_contacts {
            let mut text = format!("  ★ {}", contact.name);
            if let Some(age) = dates::age_at_next_birthday(
                contact.birth_year,
                contact.birth_month,
                contact.birth_day,
                app.today,
            ) {
                text.push_str(&format!(" turns {} today!", age));
            } else {
                text.push_str("'s birthday is today!");
            }
            lines.push(Line::from(text));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        format!("Next {} days", app.window_days),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    if later_contacts.is_empty() {
        let message = if today_contacts.is_empty() && app.contacts.is_empty() {
            "  No contacts yet. Press 'n' to add one."
        } else {
            "  No birthdays in this window."
        };
        lines.push(Line::from(message));
    } else {
        for contact in &later_contacts {
            let days = dates::days_until(contact.birth_month, contact.birth_day, app.today);
            let label = dates::format_birthday_label(
                contact.birth_month,
                contact.birth_day,
                None,
            );
            let mut text = format!("  {} - {} (in {}d)", contact.name, label, days);
            if let Some(age) = dates::age_at_next_birthday(
                contact.birth_year,
                contact.birth_month,
                contact.birth_day,
                app.today,
            ) {
                text.push_str(&format!(" turning {}", age));
            }
            lines.push(Line::from(text));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Upcoming"))
        .style(Style::default().fg(fg))
        .wrap(Wrap { trim: false })
        .scroll((app.ui.item_view_scroll as u16, 0));

    f.render_widget(paragraph, area);
}
