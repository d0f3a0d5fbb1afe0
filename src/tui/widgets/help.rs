use ratatui::widgets::{Block, Borders, Paragraph, Clear};
use ratatui::style::Style;
use ratatui::Frame;
use ratatui::layout::{Rect, Alignment, Constraint, Layout, Flex};
use crate::Config;
use crate::tui::widgets::color::parse_color;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    // Calculate popup area (60% width, 70% height, centered)
    let popup_area = popup_area(area, 60, 70);

    // Clear the background first - this prevents content from showing through
    f.render_widget(Clear, popup_area);

    let help_text = build_help_text(config);

    let paragraph = Paragraph::new(help_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Help - Key Bindings")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).bg(bg_color)))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rect using up certain percentage of the available rect
/// Based on ratatui popup example: https://ratatui.rs/examples/apps/popup/
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

fn build_help_text(config: &Config) -> String {
    let mut text = String::new();

    // Navigation section
    text.push_str("Navigation:\n");
    text.push_str(&format!("  {} / {}: Switch tabs\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.tab_left),
        crate::utils::format_key_binding_for_display(&config.key_bindings.tab_right)));
    text.push_str(&format!("  {} / {} / {}: Jump to tab\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.tab_1),
        crate::utils::format_key_binding_for_display(&config.key_bindings.tab_2),
        crate::utils::format_key_binding_for_display(&config.key_bindings.tab_3)));
    text.push_str(&format!("  {} / {}: Navigate list up/down\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.list_up),
        crate::utils::format_key_binding_for_display(&config.key_bindings.list_down)));
    text.push_str(&format!("  {}: Open selected contact\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.select)));
    text.push_str("  PgUp / PgDn: Scroll detail pane\n");
    text.push_str("\n");

    // Actions section
    text.push_str("Actions:\n");
    text.push_str(&format!("  {}: New contact or gift plan\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.new)));
    text.push_str(&format!("  {}: Edit selected item\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.edit)));
    text.push_str(&format!("  {}: Delete selected item\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.delete)));
    text.push_str(&format!("  {}: Cycle window (Upcoming tab only)\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.cycle_window)));
    text.push_str(&format!("  {}: Advance gift status (Gifts tab only)\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.advance_status)));
    text.push_str(&format!("  {}: Start search\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.search)));
    text.push_str("\n");

    // Form section
    text.push_str("Forms:\n");
    text.push_str(&format!("  {}: Save\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.save)));
    text.push_str("  Tab / Shift+Tab: Next / previous field\n");
    text.push_str("  Enter: Next field (newline in Notes)\n");
    text.push_str("  Space: Toggle or advance picker fields\n");
    text.push_str("  Home/End: Line start/end\n");
    text.push_str("  Esc: Cancel\n");
    text.push_str("\n");

    // General section
    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.quit)));
    text.push_str(&format!("  {}: Show/hide help\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.help)));
    text.push_str(&format!("  {}: Toggle sidebar\n",
        crate::utils::format_key_binding_for_display(&config.key_bindings.toggle_sidebar)));

    text
}
