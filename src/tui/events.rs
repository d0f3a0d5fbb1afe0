use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, size as terminal_size};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;

use crate::database::DatabaseError;
use crate::dates;
use crate::models::{Contact, GiftPlan, UserProfile};
use crate::tui::app::{App, ContactForm, GiftField, GiftForm, ItemForm, Mode, SelectedItem, Tab};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::utils::{now_nanos, parse_key_binding, ParsedKeyBinding};

/// Guard that ensures terminal state is restored even on panic
/// This is critical for TUI applications - if the terminal is left in raw mode
/// or alternate screen, the user's terminal will be unusable.
struct TerminalGuard {
    /// Track if we successfully entered raw mode
    raw_mode_enabled: bool,
    /// Track if we successfully entered alternate screen
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    /// Initialize terminal state and return a guard
    /// The guard will restore terminal state when dropped (even on panic)
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Manually restore terminal state (called on normal exit)
    /// After calling this, the guard will do nothing on drop
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Restore terminal state even if we panic
        // Ignore errors in drop - we're already in a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering alternate screen
    // This allows us to show a helpful error message in the normal terminal
    let (width, height) = terminal_size().map_err(TuiError::IoError)?;

    let min_width_with_border = Layout::MIN_WIDTH + 2; // +2 for borders
    let min_height_with_border = Layout::MIN_HEIGHT + 2; // +2 for borders

    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    // Setup terminal with guard to ensure restoration on panic
    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        // One clock capture per tick; the whole frame agrees on "today"
        app.refresh_clock();
        app.check_status_message_timeout();

        // Get terminal size explicitly to ensure compatibility across different terminals
        let terminal_size = terminal.size()?;
        use ratatui::layout::Rect;
        let terminal_rect = Rect::new(0, 0, terminal_size.width, terminal_size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(
                terminal_rect,
                app.config.sidebar_width_percent,
                app.ui.sidebar_state == crate::tui::app::SidebarState::Collapsed,
            );
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        // Handle events - only process Press events to avoid duplicate processing on Windows
        if event::poll(std::time::Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key_event) => {
                    if key_event.kind == KeyEventKind::Press {
                        if handle_key_event(&mut app, key_event)? {
                            break; // Quit requested
                        }
                    }
                }
                Event::Resize(_width, _height) => {
                    // Layout recalculates from terminal.size() on the next draw
                }
                _ => {
                    // Ignore other event types (mouse, etc.)
                }
            }
        }
    }

    // Restore terminal state explicitly (guard will also restore on drop, but this is cleaner)
    guard.restore()?;

    Ok(())
}

fn binding(spec: &str) -> Result<ParsedKeyBinding, TuiError> {
    parse_key_binding(spec).map_err(TuiError::KeyBindingError)
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    // Primary modifier is Ctrl on Windows/Linux, Option/Alt on macOS
    let has_primary_mod = crate::utils::has_primary_modifier(key_event.modifiers);
    if binding.requires_ctrl != has_primary_mod {
        return false;
    }

    binding.key_code == key_event.code
}

fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    // Handle delete confirmation modal first (before other modes)
    if app.modals.delete_confirmation.is_some() {
        return handle_delete_confirmation_modal(app, key_event);
    }

    match app.ui.mode {
        Mode::Setup => handle_setup_mode(app, key_event),
        Mode::Create => handle_create_mode(app, key_event),
        Mode::Help => handle_help_mode(app, key_event),
        Mode::Search => handle_search_mode(app, key_event),
        Mode::View => handle_view_mode(app, key_event),
    }
}

/// First-run profile setup: a single name prompt that must be completed
/// before the main screens are available
fn handle_setup_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Enter => {
            let name = app.setup_name.first_line().trim().to_string();
            if name.is_empty() {
                app.set_status_message("Please enter a name".to_string());
                return Ok(false);
            }
            let profile = UserProfile { name: name.clone() };
            match app.database.save_profile(&profile) {
                Ok(()) => {
                    app.profile = Some(profile);
                    app.ui.mode = Mode::View;
                    app.set_status_message(format!("Welcome, {}!", name));
                }
                Err(e) => {
                    app.set_status_message(format!("Failed to save profile: {}", e));
                }
            }
            Ok(false)
        }
        KeyCode::Backspace => {
            app.setup_name.delete_char();
            Ok(false)
        }
        KeyCode::Left => {
            app.setup_name.move_left();
            Ok(false)
        }
        KeyCode::Right => {
            app.setup_name.move_right();
            Ok(false)
        }
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            // Allow quitting from the setup screen
            Ok(true)
        }
        KeyCode::Char(ch) => {
            app.setup_name.insert_char(ch);
            Ok(false)
        }
        _ => Ok(false),
    }
}

fn handle_help_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Esc => {
            app.exit_help_mode();
            Ok(false)
        }
        _ => {
            // Help binding toggles the overlay off again
            let help_binding = binding(&app.config.key_bindings.help)?;
            if matches_key_event(key_event, &help_binding) {
                app.exit_help_mode();
            }
            Ok(false)
        }
    }
}

fn handle_search_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.exit_search_mode();
            Ok(false)
        }
        KeyCode::Up => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down => {
            app.move_selection_down();
            Ok(false)
        }
        KeyCode::Backspace => {
            app.remove_from_search();
            Ok(false)
        }
        KeyCode::Char(ch) => {
            app.add_to_search(ch);
            Ok(false)
        }
        _ => Ok(false),
    }
}

fn handle_create_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    // Check for save binding first (Ctrl+s by default)
    let save_binding = binding(&app.config.key_bindings.save)?;
    if matches_key_event(key_event, &save_binding) {
        save_form(app);
        return Ok(false);
    }

    // Is the focused field a picker (contact/status/recurring) rather than text?
    let (on_picker, on_notes) = match app.form.create_form {
        Some(ItemForm::Gift(ref form)) => (
            matches!(
                form.current_field,
                GiftField::Contact | GiftField::Status | GiftField::Recurring
            ),
            form.current_field == GiftField::Notes,
        ),
        Some(ItemForm::Contact(ref form)) => (
            false,
            form.current_field == crate::tui::app::ContactField::Notes,
        ),
        None => (false, false),
    };

    match key_event.code {
        KeyCode::Esc => {
            app.exit_create_mode();
            return Ok(false);
        }
        KeyCode::Tab => {
            app.navigate_form_field(true);
            return Ok(false);
        }
        KeyCode::BackTab => {
            app.navigate_form_field(false);
            return Ok(false);
        }
        KeyCode::Enter if !on_notes => {
            // Enter advances to the next field; in Notes it inserts a newline below
            app.navigate_form_field(true);
            return Ok(false);
        }
        KeyCode::Up if on_picker => {
            adjust_picker(app, false);
            return Ok(false);
        }
        KeyCode::Down if on_picker => {
            adjust_picker(app, true);
            return Ok(false);
        }
        KeyCode::Char(' ') if on_picker => {
            toggle_picker(app);
            return Ok(false);
        }
        _ => {}
    }

    // Forward remaining keys to the focused text field's editor
    if let Some(editor) = app.get_current_form_editor() {
        match key_event.code {
            KeyCode::Char(ch) => editor.insert_char(ch),
            KeyCode::Backspace => editor.delete_char(),
            KeyCode::Enter => editor.insert_newline(),
            KeyCode::Left => editor.move_left(),
            KeyCode::Right => editor.move_right(),
            KeyCode::Up => editor.move_up(),
            KeyCode::Down => editor.move_down(),
            KeyCode::Home => editor.move_to_line_start(),
            KeyCode::End => editor.move_to_line_end(),
            _ => {}
        }
    }

    Ok(false)
}

/// Up/Down on a picker field: cycle the contact choice. Status is
/// forward-only, so arrows do not touch it.
fn adjust_picker(app: &mut App, forward: bool) {
    if let Some(ItemForm::Gift(ref mut form)) = app.form.create_form {
        if form.current_field == GiftField::Contact && !form.editing {
            let len = form.contact_choices.len();
            if len > 0 {
                form.contact_index = if forward {
                    (form.contact_index + 1) % len
                } else {
                    (form.contact_index + len - 1) % len
                };
            }
        }
    }
}

/// Space on a picker field: toggle recurring, or advance the status one
/// step (Planned -> Ordered -> Sent, never backwards)
fn toggle_picker(app: &mut App) {
    if let Some(ItemForm::Gift(ref mut form)) = app.form.create_form {
        match form.current_field {
            GiftField::Recurring => form.yearly_recurring = !form.yearly_recurring,
            GiftField::Status => form.status = form.status.advance(),
            _ => {}
        }
    }
}

fn save_form(app: &mut App) {
    let Some(form) = app.form.create_form.clone() else {
        return;
    };
    let result = match form {
        ItemForm::Contact(contact_form) => save_contact_form(app, &contact_form),
        ItemForm::Gift(gift_form) => save_gift_form(app, &gift_form),
    };
    match result {
        Ok(message) => {
            if let Err(e) = app.load_data() {
                app.set_status_message(format!("Failed to reload data: {}", e));
            } else {
                app.exit_create_mode();
                app.set_status_message(message);
            }
        }
        Err(message) => {
            // Stay in the form so the user can fix the input
            app.set_status_message(message);
        }
    }
}

fn save_contact_form(app: &mut App, form: &ContactForm) -> Result<String, String> {
    let name = form.name.first_line().trim().to_string();
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    let month: u32 = form
        .month
        .first_line()
        .trim()
        .parse()
        .map_err(|_| "Month must be a number (1-12)".to_string())?;
    let day: u32 = form
        .day
        .first_line()
        .trim()
        .parse()
        .map_err(|_| "Day must be a number".to_string())?;
    let year_text = form.year.first_line().trim().to_string();
    let birth_year: Option<i32> = if year_text.is_empty() {
        None
    } else {
        Some(
            year_text
                .parse()
                .map_err(|_| "Year must be a number".to_string())?,
        )
    };
    let notes = if form.notes.is_empty() {
        None
    } else {
        Some(form.notes.contents())
    };

    if let Some(ref id) = form.editing_id {
        let existing = app
            .database
            .get_contact(id)
            .map_err(|e| format!("Failed to load contact: {}", e))?;
        let contact = Contact {
            id: id.clone(),
            name,
            birth_month: month,
            birth_day: day,
            birth_year,
            notes,
            created_at: existing.created_at,
            updated_at: now_nanos(),
        };
        app.database
            .update_contact(&contact)
            .map_err(format_save_error)?;
        Ok("Contact updated".to_string())
    } else {
        let mut contact = Contact::new(name, month, day);
        contact.birth_year = birth_year;
        contact.notes = notes;
        app.database
            .insert_contact(&contact)
            .map_err(format_save_error)?;
        Ok("Contact created".to_string())
    }
}

fn save_gift_form(app: &mut App, form: &GiftForm) -> Result<String, String> {
    let (contact_id, _) = form
        .contact_choices
        .get(form.contact_index)
        .cloned()
        .ok_or_else(|| "No contact selected".to_string())?;
    let idea = form.idea.first_line().trim().to_string();
    if idea.is_empty() {
        return Err("Gift idea cannot be empty".to_string());
    }
    let budget_text = form.budget.first_line().trim().to_string();
    let budget: Option<i64> = if budget_text.is_empty() {
        None
    } else {
        Some(
            budget_text
                .parse()
                .map_err(|_| "Budget must be a whole number".to_string())?,
        )
    };
    let notes = if form.notes.is_empty() {
        None
    } else {
        Some(form.notes.contents())
    };

    // The plan targets the contact's next birthday as of the save
    let contact = app
        .contacts
        .iter()
        .find(|c| c.id == contact_id)
        .ok_or_else(|| "Contact no longer exists".to_string())?;
    let planned_date =
        dates::occurrence_nanos(contact.birth_month, contact.birth_day, app.today);

    if form.editing {
        let existing = app
            .database
            .get_gift_plan(&contact_id)
            .map_err(|e| format!("Failed to load gift plan: {}", e))?
            .ok_or_else(|| "Gift plan no longer exists".to_string())?;
        let plan = GiftPlan {
            contact_id,
            gift_idea: idea,
            planned_date,
            budget,
            notes,
            status: form.status,
            yearly_recurring: form.yearly_recurring,
            created_at: existing.created_at,
            updated_at: now_nanos(),
        };
        app.database
            .update_gift_plan(&plan)
            .map_err(format_save_error)?;
        Ok("Gift plan updated".to_string())
    } else {
        let mut plan = GiftPlan::new(contact_id, idea);
        plan.planned_date = planned_date;
        plan.budget = budget;
        plan.notes = notes;
        plan.status = form.status;
        plan.yearly_recurring = form.yearly_recurring;
        app.database
            .insert_gift_plan(&plan)
            .map_err(format_save_error)?;
        Ok("Gift plan created".to_string())
    }
}

fn format_save_error(e: DatabaseError) -> String {
    match e {
        DatabaseError::InvalidInput(msg) => msg,
        other => format!("Failed to save: {}", other),
    }
}

fn handle_delete_confirmation_modal(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Up | KeyCode::Down => {
            // Two options: flip between Delete and Cancel
            app.modals.delete_modal_selection = 1 - app.modals.delete_modal_selection;
            Ok(false)
        }
        KeyCode::Enter => {
            if app.modals.delete_modal_selection == 1 {
                // Cancel - just close modal
                app.modals.delete_confirmation = None;
                return Ok(false);
            }

            if let Some(item) = app.modals.delete_confirmation.clone() {
                let result = match item {
                    SelectedItem::Contact(contact) => app
                        .database
                        .delete_contact(&contact.id)
                        .map(|_| "Contact deleted".to_string()),
                    SelectedItem::Gift(plan) => app
                        .database
                        .delete_gift_plan(&plan.contact_id)
                        .map(|_| "Gift plan deleted".to_string()),
                };
                match result {
                    Ok(message) => {
                        if let Err(e) = app.load_data() {
                            app.set_status_message(format!("Failed to reload data: {}", e));
                        } else {
                            app.adjust_selected_index();
                            app.set_status_message(message);
                        }
                    }
                    Err(e) => {
                        app.set_status_message(format!("Failed to delete: {}", e));
                    }
                }
            }
            app.modals.delete_confirmation = None;
            Ok(false)
        }
        KeyCode::Esc => {
            app.modals.delete_confirmation = None;
            Ok(false)
        }
        _ => {
            // Ignore all other keys when confirmation modal is shown
            Ok(false)
        }
    }
}

fn handle_view_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if matches_key_event(key_event, &binding(&kb.quit)?) {
        return Ok(true);
    }
    if matches_key_event(key_event, &binding(&kb.help)?) {
        app.enter_help_mode();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.toggle_sidebar)?) {
        app.toggle_sidebar();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.new)?) {
        app.enter_create_mode();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.edit)?) {
        app.enter_edit_mode();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.delete)?) {
        if let Some(item) = app.selected_item() {
            app.modals.delete_confirmation = Some(item);
            app.modals.delete_modal_selection = 0;
        } else {
            app.set_status_message("No item selected".to_string());
        }
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.search)?) {
        app.enter_search_mode();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.list_up)?) {
        app.move_selection_up();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.list_down)?) {
        app.move_selection_down();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.tab_left)?) {
        app.prev_tab();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.tab_right)?) {
        app.next_tab();
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.tab_1)?) {
        app.switch_tab(Tab::Upcoming);
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.tab_2)?) {
        app.switch_tab(Tab::Contacts);
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.tab_3)?) {
        app.switch_tab(Tab::Gifts);
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.cycle_window)?) {
        if app.ui.current_tab == Tab::Upcoming {
            app.cycle_window();
        }
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.advance_status)?) {
        if app.ui.current_tab == Tab::Gifts {
            advance_selected_status(app);
        }
        return Ok(false);
    }
    if matches_key_event(key_event, &binding(&kb.select)?) {
        // On the dashboard, jump to the selected contact on the Contacts tab
        if app.ui.current_tab == Tab::Upcoming {
            if let Some(contact) = app.selected_contact() {
                app.switch_tab(Tab::Contacts);
                if let Some(idx) = app.filtered_contacts().iter().position(|c| c.id == contact.id) {
                    app.ui.selected_index = idx;
                    app.sync_list_state();
                }
            }
        }
        return Ok(false);
    }

    match key_event.code {
        KeyCode::Up => app.move_selection_up(),
        KeyCode::Down => app.move_selection_down(),
        KeyCode::PageUp => {
            app.ui.item_view_scroll = app.ui.item_view_scroll.saturating_sub(5);
        }
        KeyCode::PageDown => {
            app.ui.item_view_scroll += 5;
        }
        _ => {}
    }

    Ok(false)
}

/// Quick status advance on the Gifts tab: one step toward Sent
fn advance_selected_status(app: &mut App) {
    let Some(plan) = app.selected_gift_plan() else {
        app.set_status_message("No gift plan selected".to_string());
        return;
    };
    let next = plan.status.advance();
    if next == plan.status {
        app.set_status_message("Already Sent".to_string());
        return;
    }
    let updated = GiftPlan {
        status: next,
        updated_at: now_nanos(),
        ..plan
    };
    match app.database.update_gift_plan(&updated) {
        Ok(()) => {
            if let Err(e) = app.load_data() {
                app.set_status_message(format!("Failed to reload data: {}", e));
            } else {
                app.set_status_message(format!("Status: {}", next));
            }
        }
        Err(e) => {
            app.set_status_message(format!("Failed to update status: {}", e));
        }
    }
}
