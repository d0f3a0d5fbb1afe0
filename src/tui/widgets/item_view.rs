use ratatui::widgets::{Block, Borders, Paragraph, Wrap, Scrollbar, ScrollbarState, ScrollbarOrientation};
use ratatui::style::{Style, Modifier};
use ratatui::text::{Line, Span, Text};
use ratatui::Frame;
use ratatui::layout::Rect;
use chrono::{NaiveDate, DateTime, Utc};
use crate::models::{Contact, GiftPlan};
use crate::Config;
use crate::dates;
use crate::tui::widgets::color::parse_color;

pub fn render_contact_view(
    f: &mut Frame,
    area: Rect,
    contact: &Contact,
    gift_plan: Option<&GiftPlan>,
    today: NaiveDate,
    now: DateTime<Utc>,
    scroll: &mut usize,
    config: &Config,
) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        contact.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let label = dates::format_birthday_label(contact.birth_month, contact.birth_day, contact.birth_year);
    lines.push(Line::from(format!("Birthday: {}", label)));

    let days = dates::days_until(contact.birth_month, contact.birth_day, today);
    if days == 0 {
        lines.push(Line::from("Birthday is today!"));
    } else {
        let next = dates::next_occurrence(contact.birth_month, contact.birth_day, today);
        lines.push(Line::from(format!(
            "Next: {} (in {} day{})",
            next.format("%B %-d, %Y"),
            days,
            if days == 1 { "" } else { "s" },
        )));
    }

    if let Some(age) = dates::current_age(
        contact.birth_year,
        contact.birth_month,
        contact.birth_day,
        today,
    ) {
        lines.push(Line::from(format!("Age: {}", age)));
    }
    if days != 0 {
        if let Some(turning) = dates::age_at_next_birthday(
            contact.birth_year,
            contact.birth_month,
            contact.birth_day,
            today,
        ) {
            lines.push(Line::from(format!("Turning: {}", turning)));
        }
    }

    lines.push(Line::from(""));
    match gift_plan {
        Some(plan) => {
            lines.push(Line::from(format!("Gift plan: {} [{}]", plan.gift_idea, plan.status)));
        }
        None => {
            lines.push(Line::from("No gift plan yet."));
        }
    }

    if let Some(notes) = &contact.notes {
        if !notes.trim().is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Notes",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for note_line in notes.lines() {
                lines.push(Line::from(note_line.to_string()));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "Added {} | Updated {}",
            dates::format_relative_timestamp(contact.created_at, now),
            dates::format_relative_timestamp(contact.updated_at, now),
        ),
        Style::default().add_modifier(Modifier::DIM),
    )));

    render_detail(f, area, "Contact", lines, scroll, config);
}

pub fn render_gift_view(
    f: &mut Frame,
    area: Rect,
    plan: &GiftPlan,
    contact: Option<&Contact>,
    today: NaiveDate,
    now: DateTime<Utc>,
    scroll: &mut usize,
    config: &Config,
) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        plan.gift_idea.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    match contact {
        Some(contact) => {
            lines.push(Line::from(format!("For: {}", contact.name)));
            let days = dates::days_until(contact.birth_month, contact.birth_day, today);
            let label = dates::format_birthday_label(contact.birth_month, contact.birth_day, None);
            if days == 0 {
                lines.push(Line::from(format!("Birthday: {} (today!)", label)));
            } else {
                lines.push(Line::from(format!("Birthday: {} (in {}d)", label, days)));
            }
        }
        None => {
            lines.push(Line::from("For: (unknown contact)"));
        }
    }

    lines.push(Line::from(format!("Status: {}", plan.status)));

    if let Some(budget) = plan.budget {
        lines.push(Line::from(format!("Budget: ${}", budget)));
    }

    if plan.planned_date != 0 {
        let planned = DateTime::from_timestamp_nanos(plan.planned_date);
        lines.push(Line::from(format!("Planned for: {}", planned.format("%B %-d, %Y"))));
    }

    lines.push(Line::from(format!(
        "Recurring: {}",
        if plan.yearly_recurring { "yearly" } else { "one-time" },
    )));

    if let Some(notes) = &plan.notes {
        if !notes.trim().is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Notes",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for note_line in notes.lines() {
                lines.push(Line::from(note_line.to_string()));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "Added {} | Updated {}",
            dates::format_relative_timestamp(plan.created_at, now),
            dates::format_relative_timestamp(plan.updated_at, now),
        ),
        Style::default().add_modifier(Modifier::DIM),
    )));

    render_detail(f, area, "Gift Plan", lines, scroll, config);
}

pub fn render_empty_view(f: &mut Frame, area: Rect, message: &str, config: &Config) {
    let active_theme = config.get_active_theme();
    let paragraph = Paragraph::new(message)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(parse_color(&active_theme.fg)));
    f.render_widget(paragraph, area);
}

/// Renders detail lines with a clamped scroll offset and a scrollbar when
/// the content overflows the pane
fn render_detail(
    f: &mut Frame,
    area: Rect,
    title: &str,
    lines: Vec<Line>,
    scroll: &mut usize,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);

    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2) as usize;
    let max_scroll = total_lines.saturating_sub(visible_height);
    if *scroll > max_scroll {
        *scroll = max_scroll;
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(fg))
        .wrap(Wrap { trim: false })
        .scroll((*scroll as u16, 0));

    f.render_widget(paragraph, area);

    if total_lines > visible_height && area.width > 1 && area.height > 2 {
        let scrollbar_area = Rect::new(
            area.x + area.width - 1,
            area.y + 1,
            1,
            area.height.saturating_sub(2),
        );

        let mut scrollbar_state = ScrollbarState::new(total_lines)
            .viewport_content_length(visible_height)
            .position(*scroll);

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}
