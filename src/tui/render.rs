use ratatui::Frame;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::style::Style;
use crate::tui::{App, Layout};
use crate::tui::app::{Mode, Tab, SidebarState, ItemForm};
use crate::tui::widgets::{
    tabs::render_tabs,
    contact_list::render_contact_list,
    gift_list::render_gift_list,
    upcoming::render_upcoming_dashboard,
    item_view::{render_contact_view, render_gift_view, render_empty_view},
    status_bar::render_status_bar,
    help::render_help,
    setup::render_setup,
    form::{render_contact_form, render_gift_form},
    color::parse_color,
    confirm_delete::render_confirm_delete,
};

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    // Outer border with the app title centered in the top edge
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("BDG")
        .title_alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.ui.current_tab, app.window_days, &app.config);

    // Sidebar list for the active tab
    if app.ui.sidebar_state == SidebarState::Expanded && layout.sidebar_area.width > 0 {
        match app.ui.current_tab {
            Tab::Upcoming => {
                let contacts = app.upcoming_contacts();
                let total_count = app.contacts.len();
                let today = app.today;
                render_contact_list(
                    f,
                    layout.sidebar_area,
                    &contacts,
                    total_count,
                    today,
                    true,
                    &mut app.ui.list_state,
                    &app.config,
                );
            }
            Tab::Contacts => {
                let contacts = app.filtered_contacts();
                let total_count = app.contacts.len();
                let today = app.today;
                render_contact_list(
                    f,
                    layout.sidebar_area,
                    &contacts,
                    total_count,
                    today,
                    false,
                    &mut app.ui.list_state,
                    &app.config,
                );
            }
            Tab::Gifts => {
                let plans = app.filtered_gift_plans();
                let names: Vec<String> = plans
                    .iter()
                    .map(|plan| {
                        app.contact_name(&plan.contact_id)
                            .unwrap_or("(unknown)")
                            .to_string()
                    })
                    .collect();
                let total_count = app.gift_plans.len();
                render_gift_list(
                    f,
                    layout.sidebar_area,
                    &plans,
                    &names,
                    total_count,
                    &mut app.ui.list_state,
                    &app.config,
                );
            }
        }
    }

    // Main pane. Overlay modes (Help, Setup) draw the normal content first
    // and the popup after.
    match app.ui.mode {
        Mode::View | Mode::Help | Mode::Search | Mode::Setup => {
            render_main_content(f, app, layout);
        }
        Mode::Create => {
            match &app.form.create_form {
                Some(ItemForm::Contact(contact_form)) => {
                    render_contact_form(f, layout.main_area, contact_form, &app.config);
                }
                Some(ItemForm::Gift(gift_form)) => {
                    render_gift_form(f, layout.main_area, gift_form, &app.config);
                }
                None => {
                    render_empty_view(f, layout.main_area, "No form", &app.config);
                }
            }
        }
    }

    // Search query line replaces the status hints while typing
    if app.ui.mode == Mode::Search {
        let search_text = format!("Search: {}", app.search.query);
        let paragraph = Paragraph::new(search_text)
            .style(Style::default().fg(fg_color).bg(bg_color));
        f.render_widget(paragraph, layout.status_area);
    }

    if app.ui.mode == Mode::Help {
        render_help(f, f.area(), &app.config);
    }

    if app.ui.mode == Mode::Setup {
        render_setup(f, f.area(), app);
    }

    if let Some(item) = app.modals.delete_confirmation.clone() {
        render_confirm_delete(f, f.area(), &item, app.modals.delete_modal_selection, &app.config);
    }

    if app.ui.mode != Mode::Search {
        let key_hints = get_key_hints(app);
        render_status_bar(
            f,
            layout.status_area,
            app.status.message.as_ref(),
            &key_hints,
            &app.config,
        );
    }
}

fn render_main_content(f: &mut Frame, app: &mut App, layout: &Layout) {
    match app.ui.current_tab {
        Tab::Upcoming => {
            render_upcoming_dashboard(f, layout.main_area, app);
        }
        Tab::Contacts => {
            match app.selected_contact() {
                Some(contact) => {
                    let plan = app
                        .gift_plans
                        .iter()
                        .find(|p| p.contact_id == contact.id)
                        .cloned();
                    let today = app.today;
                    let now = app.now;
                    let mut scroll = app.ui.item_view_scroll;
                    render_contact_view(
                        f,
                        layout.main_area,
                        &contact,
                        plan.as_ref(),
                        today,
                        now,
                        &mut scroll,
                        &app.config,
                    );
                    app.ui.item_view_scroll = scroll;
                }
                None => {
                    render_empty_view(
                        f,
                        layout.main_area,
                        "No contacts yet. Press 'n' to add one.",
                        &app.config,
                    );
                }
            }
        }
        Tab::Gifts => {
            match app.selected_gift_plan() {
                Some(plan) => {
                    let contact = app
                        .contacts
                        .iter()
                        .find(|c| c.id == plan.contact_id)
                        .cloned();
                    let today = app.today;
                    let now = app.now;
                    let mut scroll = app.ui.item_view_scroll;
                    render_gift_view(
                        f,
                        layout.main_area,
                        &plan,
                        contact.as_ref(),
                        today,
                        now,
                        &mut scroll,
                        &app.config,
                    );
                    app.ui.item_view_scroll = scroll;
                }
                None => {
                    render_empty_view(
                        f,
                        layout.main_area,
                        "No gift plans yet. Press 'n' to add one.",
                        &app.config,
                    );
                }
            }
        }
    }
}

fn get_key_hints(app: &App) -> Vec<String> {
    match app.ui.mode {
        Mode::Help => {
            vec![
                format!("Esc or {}: Exit help", crate::utils::format_key_binding_for_display(&app.config.key_bindings.help)),
            ]
        }
        Mode::Setup => {
            vec![
                "Type your name".to_string(),
                "Enter: Continue".to_string(),
            ]
        }
        Mode::Search => {
            vec![
                "Esc: Exit search".to_string(),
            ]
        }
        Mode::Create => {
            vec![
                "Tab/Enter: Next field".to_string(),
                "Shift+Tab: Previous field".to_string(),
                format!("{}: Save", crate::utils::format_key_binding_for_display(&app.config.key_bindings.save)),
                "Esc: Cancel".to_string(),
            ]
        }
        Mode::View => {
            let mut hints = vec![
                format!("{}: Quit", crate::utils::format_key_binding_for_display(&app.config.key_bindings.quit)),
                format!("{}: New", crate::utils::format_key_binding_for_display(&app.config.key_bindings.new)),
                format!("{}: Edit", crate::utils::format_key_binding_for_display(&app.config.key_bindings.edit)),
                format!("{}: Delete", crate::utils::format_key_binding_for_display(&app.config.key_bindings.delete)),
                format!("{}: Search", crate::utils::format_key_binding_for_display(&app.config.key_bindings.search)),
            ];

            if app.ui.current_tab == Tab::Upcoming {
                hints.push(format!(
                    "{}: Window",
                    crate::utils::format_key_binding_for_display(&app.config.key_bindings.cycle_window)
                ));
            }
            if app.ui.current_tab == Tab::Gifts {
                hints.push(format!(
                    "{}: Advance status",
                    crate::utils::format_key_binding_for_display(&app.config.key_bindings.advance_status)
                ));
            }

            hints.push(format!("{}: Toggle sidebar", crate::utils::format_key_binding_for_display(&app.config.key_bindings.toggle_sidebar)));
            hints.push(format!("{}: Help", crate::utils::format_key_binding_for_display(&app.config.key_bindings.help)));

            hints
        }
    }
}
