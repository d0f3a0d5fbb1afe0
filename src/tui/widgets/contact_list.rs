use ratatui::widgets::{Block, Borders, List, ListItem, StatefulWidget, Scrollbar, ScrollbarState, ScrollbarOrientation};
use ratatui::style::Style;
use ratatui::Frame;
use ratatui::layout::{Rect, Layout, Direction, Constraint};
use ratatui::widgets::ListState;
use chrono::NaiveDate;
use crate::models::Contact;
use crate::Config;
use crate::dates;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};

/// Short month-day label for list rows, e.g. "Jun 1"
fn short_birthday(contact: &Contact) -> String {
    let month = dates::MONTH_NAMES
        .get(contact.birth_month.wrapping_sub(1) as usize)
        .map(|m| &m[..3])
        .unwrap_or("???");
    format!("{} {}", month, contact.birth_day)
}

pub fn render_contact_list(
    f: &mut Frame,
    area: Rect,
    contacts: &[Contact],
    total_count: usize,
    today: NaiveDate,
    show_days_until: bool,
    list_state: &mut ListState,
    config: &Config,
) {
    // Calculate max width for truncation (account for borders and padding)
    let max_width = area.width.saturating_sub(4) as usize;

    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    let items: Vec<ListItem> = contacts
        .iter()
        .map(|contact| {
            let mut line = if show_days_until {
                let days = dates::days_until(contact.birth_month, contact.birth_day, today);
                if days == 0 {
                    format!("★ {} (today!)", contact.name)
                } else {
                    format!("{} ({} in {}d)", contact.name, short_birthday(contact), days)
                }
            } else {
                format!("{} ({})", contact.name, short_birthday(contact))
            };

            if line.chars().count() > max_width {
                line = line.chars().take(max_width.saturating_sub(3)).collect::<String>() + "...";
            }

            ListItem::new(line)
        })
        .collect();

    // Split area to reserve space for scrollbar
    let list_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // Scrollbar
        ])
        .split(area);

    let list_area = list_areas[0];
    let scrollbar_area = list_areas[1];

    let title = format!("Contacts ({} of {})", contacts.len(), total_count);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(parse_color(&active_theme.fg)))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    render_list_scrollbar(f, list_area, scrollbar_area, contacts.len(), list_state);
}

/// Shared scrollbar for sidebar lists: only drawn when the list overflows
/// the visible area
pub fn render_list_scrollbar(
    f: &mut Frame,
    list_area: Rect,
    scrollbar_area: Rect,
    total_items: usize,
    list_state: &ListState,
) {
    let visible_items = list_area.height.saturating_sub(2) as usize; // Account for borders

    if total_items <= visible_items || scrollbar_area.width == 0 || list_area.height <= 2 {
        return;
    }

    let scrollbar_inner_area = Rect::new(
        scrollbar_area.x,
        list_area.y + 1, // Start after top border
        scrollbar_area.width,
        list_area.height.saturating_sub(2), // Match inner list height
    );

    if scrollbar_inner_area.width == 0 || scrollbar_inner_area.height == 0 {
        return;
    }

    let selected_index = list_state.selected().unwrap_or(0);
    let scroll_position = if selected_index < visible_items {
        0
    } else {
        selected_index.saturating_sub(visible_items - 1)
    };

    let mut scrollbar_state = ScrollbarState::new(total_items)
        .viewport_content_length(visible_items)
        .position(scroll_position);

    let scrollbar = Scrollbar::default()
        .orientation(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .track_symbol(Some("│"))
        .thumb_symbol("█");

    f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
}
