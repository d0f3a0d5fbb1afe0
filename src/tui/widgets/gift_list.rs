use ratatui::widgets::{Block, Borders, List, ListItem, StatefulWidget};
use ratatui::style::Style;
use ratatui::Frame;
use ratatui::layout::{Rect, Layout, Direction, Constraint};
use ratatui::widgets::ListState;
use crate::models::{GiftPlan, GiftStatus};
use crate::Config;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};
use crate::tui::widgets::contact_list::render_list_scrollbar;

/// One-char status marker for list rows
fn status_symbol(status: GiftStatus) -> &'static str {
    match status {
        GiftStatus::Planned => "○",
        GiftStatus::Ordered => "◐",
        GiftStatus::Sent => "●",
    }
}

/// `contact_names` runs parallel to `gift_plans`, resolved by the caller
pub fn render_gift_list(
    f: &mut Frame,
    area: Rect,
    gift_plans: &[GiftPlan],
    contact_names: &[String],
    total_count: usize,
    list_state: &mut ListState,
    config: &Config,
) {
    let max_width = area.width.saturating_sub(4) as usize;

    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    let items: Vec<ListItem> = gift_plans
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            let name = contact_names.get(i).map(String::as_str).unwrap_or("?");
            let mut line = format!(
                "{} {} ({})",
                status_symbol(plan.status),
                plan.gift_idea,
                name,
            );

            if line.chars().count() > max_width {
                line = line.chars().take(max_width.saturating_sub(3)).collect::<String>() + "...";
            }

            ListItem::new(line)
        })
        .collect();

    let list_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // Scrollbar
        ])
        .split(area);

    let list_area = list_areas[0];
    let scrollbar_area = list_areas[1];

    let title = format!("Gift Plans ({} of {})", gift_plans.len(), total_count);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(parse_color(&active_theme.fg)))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    render_list_scrollbar(f, list_area, scrollbar_area, gift_plans.len(), list_state);
}
