use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::style::{Style, Modifier};
use ratatui::text::{Line, Span, Text};
use ratatui::Frame;
use ratatui::layout::{Rect, Constraint, Layout, Direction};
use crate::tui::app::{ContactForm, ContactField, GiftForm, GiftField};
use crate::tui::widgets::editor::Editor;
use crate::Config;
use crate::tui::widgets::color::parse_color;

pub fn render_contact_form(f: &mut Frame, area: Rect, form: &ContactForm, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let title = if form.editing_id.is_some() {
        "Edit Contact"
    } else {
        "New Contact"
    };
    let outer = Block::default().borders(Borders::ALL).title(title);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Month
            Constraint::Length(3), // Day
            Constraint::Length(3), // Year
            Constraint::Min(3),    // Notes
        ])
        .split(inner);

    render_text_field(f, rows[0], "Name", &form.name,
        form.current_field == ContactField::Name, fg, highlight_bg);
    render_text_field(f, rows[1], "Month (1-12)", &form.month,
        form.current_field == ContactField::Month, fg, highlight_bg);
    render_text_field(f, rows[2], "Day", &form.day,
        form.current_field == ContactField::Day, fg, highlight_bg);
    render_text_field(f, rows[3], "Year (optional)", &form.year,
        form.current_field == ContactField::Year, fg, highlight_bg);
    render_text_field(f, rows[4], "Notes", &form.notes,
        form.current_field == ContactField::Notes, fg, highlight_bg);
}

pub fn render_gift_form(f: &mut Frame, area: Rect, form: &GiftForm, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let title = if form.editing { "Edit Gift Plan" } else { "New Gift Plan" };
    let outer = Block::default().borders(Borders::ALL).title(title);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Contact
            Constraint::Length(3), // Idea
            Constraint::Length(3), // Budget
            Constraint::Length(3), // Status
            Constraint::Length(3), // Recurring
            Constraint::Min(3),    // Notes
        ])
        .split(inner);

    let contact_label = form
        .contact_choices
        .get(form.contact_index)
        .map(|(_, name)| name.as_str())
        .unwrap_or("(no contacts)");
    render_picker_field(f, rows[0], "Contact", contact_label,
        form.current_field == GiftField::Contact && !form.editing,
        "↑/↓ to change", fg, highlight_bg);

    render_text_field(f, rows[1], "Gift idea", &form.idea,
        form.current_field == GiftField::Idea, fg, highlight_bg);
    render_text_field(f, rows[2], "Budget (optional)", &form.budget,
        form.current_field == GiftField::Budget, fg, highlight_bg);

    render_picker_field(f, rows[3], "Status", form.status.as_str(),
        form.current_field == GiftField::Status,
        "Space to advance", fg, highlight_bg);
    render_picker_field(
        f,
        rows[4],
        "Recurring",
        if form.yearly_recurring { "yearly" } else { "one-time" },
        form.current_field == GiftField::Recurring,
        "Space to toggle",
        fg,
        highlight_bg,
    );

    render_text_field(f, rows[5], "Notes", &form.notes,
        form.current_field == GiftField::Notes, fg, highlight_bg);
}

/// Bordered single editor field. Places the terminal cursor inside the
/// active field so typing feels anchored.
fn render_text_field(
    f: &mut Frame,
    area: Rect,
    label: &str,
    editor: &Editor,
    active: bool,
    fg: ratatui::style::Color,
    highlight_bg: ratatui::style::Color,
) {
    let border_style = if active {
        Style::default().fg(highlight_bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(fg)
    };

    let lines: Vec<Line> = editor
        .lines
        .iter()
        .map(|l| Line::from(l.clone()))
        .collect();

    // Keep the cursor line visible inside short fields
    let visible_height = area.height.saturating_sub(2) as usize;
    let scroll = if visible_height > 0 && editor.cursor_line >= visible_height {
        editor.cursor_line + 1 - visible_height
    } else {
        0
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(label),
        )
        .style(Style::default().fg(fg))
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));

    f.render_widget(paragraph, area);

    if active && area.width > 2 && area.height > 2 {
        let inner_width = area.width.saturating_sub(2) as usize;
        let col = editor.cursor_col.min(inner_width.saturating_sub(1));
        let row = editor.cursor_line.saturating_sub(scroll);
        let cursor_x = area.x + 1 + col as u16;
        let cursor_y = area.y + 1 + row as u16;
        if cursor_y < area.y + area.height - 1 {
            f.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

fn render_picker_field(
    f: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    active: bool,
    hint: &str,
    fg: ratatui::style::Color,
    highlight_bg: ratatui::style::Color,
) {
    let border_style = if active {
        Style::default().fg(highlight_bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(fg)
    };

    let mut spans = vec![Span::raw(value.to_string())];
    if active {
        spans.push(Span::styled(
            format!("  ({})", hint),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(label),
        )
        .style(Style::default().fg(fg));

    f.render_widget(paragraph, area);
}
