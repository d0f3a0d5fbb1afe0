use crate::{Config, Database, models::{Contact, GiftPlan, GiftStatus, UserProfile}};
use crate::config::WINDOW_CHOICES;
use crate::database::DatabaseError;
use crate::dates;
use crate::tui::widgets::editor::Editor;
use chrono::{DateTime, NaiveDate, Utc};
use ratatui::widgets::ListState;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Upcoming,
    Contacts,
    Gifts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarState {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    View,
    Search,
    Create,
    Help,
    Setup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Month,
    Day,
    Year,
    Notes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftField {
    Contact,
    Idea,
    Budget,
    Notes,
    Status,
    Recurring,
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    pub current_field: ContactField,
    pub name: Editor,
    pub month: Editor,
    pub day: Editor,
    pub year: Editor,
    pub notes: Editor,
    pub editing_id: Option<String>, // None for new contacts
}

#[derive(Debug, Clone)]
pub struct GiftForm {
    pub current_field: GiftField,
    /// Candidate contacts for a new plan (id, name); fixed to one entry when editing
    pub contact_choices: Vec<(String, String)>,
    pub contact_index: usize,
    pub idea: Editor,
    pub budget: Editor,
    pub notes: Editor,
    pub status: GiftStatus,
    pub yearly_recurring: bool,
    pub editing: bool,
}

#[derive(Debug, Clone)]
pub enum ItemForm {
    Contact(ContactForm),
    Gift(GiftForm),
}

#[derive(Debug, Clone)]
pub enum SelectedItem {
    Contact(Contact),
    Gift(GiftPlan),
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub current_tab: Tab,
    pub sidebar_state: SidebarState,
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
    pub item_view_scroll: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tab: Tab::Upcoming,
            sidebar_state: SidebarState::Expanded,
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
            item_view_scroll: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub delete_confirmation: Option<SelectedItem>,
    pub delete_modal_selection: usize, // 0 = Delete, 1 = Cancel
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub create_form: Option<ItemForm>,
}

pub struct App {
    // Core infrastructure
    pub config: Config,
    pub database: Database,

    // Data collections
    pub profile: Option<UserProfile>,
    pub contacts: Vec<Contact>,
    pub gift_plans: Vec<GiftPlan>,

    // Clock, captured once per event-loop tick so every date calculation
    // within a frame agrees on "today"
    pub today: NaiveDate,
    pub now: DateTime<Utc>,

    // Upcoming-window size currently shown on the dashboard
    pub window_days: i64,

    // Grouped state
    pub ui: UiState,
    pub modals: ModalState,
    pub status: StatusState,
    pub search: SearchState,
    pub form: FormState,
    pub setup_name: Editor,
}

impl App {
    pub fn new(config: Config, database: Database) -> Result<Self, DatabaseError> {
        let window_days = config.initial_window_days();
        let profile = database.get_profile()?;

        let mut app = Self {
            config,
            database,
            profile,
            contacts: Vec::new(),
            gift_plans: Vec::new(),
            today: chrono::Local::now().date_naive(),
            now: Utc::now(),
            window_days,
            ui: UiState::default(),
            modals: ModalState::default(),
            status: StatusState::default(),
            search: SearchState::default(),
            form: FormState::default(),
            setup_name: Editor::new(),
        };

        // First run: ask for a profile name before showing the main screens
        if app.profile.is_none() {
            app.ui.mode = Mode::Setup;
        }

        app.load_data()?;
        app.adjust_selected_index();
        Ok(app)
    }

    pub fn load_data(&mut self) -> Result<(), DatabaseError> {
        self.contacts = self.database.get_all_contacts()?;
        self.gift_plans = self.database.get_all_gift_plans()?;
        self.adjust_selected_index();
        Ok(())
    }

    /// Capture the clock for this tick
    pub fn refresh_clock(&mut self) {
        self.today = chrono::Local::now().date_naive();
        self.now = Utc::now();
    }

    /// Contacts whose next birthday falls within the active window,
    /// soonest first. Honors the search query like the other tabs.
    pub fn upcoming_contacts(&self) -> Vec<Contact> {
        let mut upcoming: Vec<Contact> = self
            .filtered_contacts()
            .into_iter()
            .filter(|c| dates::days_until(c.birth_month, c.birth_day, self.today) <= self.window_days)
            .collect();
        upcoming.sort_by_key(|c| {
            (
                dates::days_until(c.birth_month, c.birth_day, self.today),
                c.name.to_lowercase(),
            )
        });
        upcoming
    }

    /// Contacts filtered by the active search query (Contacts tab)
    pub fn filtered_contacts(&self) -> Vec<Contact> {
        if self.ui.mode == Mode::Search && !self.search.query.is_empty() {
            let query = self.search.query.to_lowercase();
            self.contacts
                .iter()
                .filter(|c| c.name.to_lowercase().contains(&query))
                .cloned()
                .collect()
        } else {
            self.contacts.clone()
        }
    }

    /// Gift plans filtered by the active search query, matched against
    /// the idea text and the contact name (Gifts tab)
    pub fn filtered_gift_plans(&self) -> Vec<GiftPlan> {
        if self.ui.mode == Mode::Search && !self.search.query.is_empty() {
            let query = self.search.query.to_lowercase();
            self.gift_plans
                .iter()
                .filter(|p| {
                    p.gift_idea.to_lowercase().contains(&query)
                        || self
                            .contact_name(&p.contact_id)
                            .map(|n| n.to_lowercase().contains(&query))
                            .unwrap_or(false)
                })
                .cloned()
                .collect()
        } else {
            self.gift_plans.clone()
        }
    }

    pub fn contact_name(&self, contact_id: &str) -> Option<&str> {
        self.contacts
            .iter()
            .find(|c| c.id == contact_id)
            .map(|c| c.name.as_str())
    }

    /// Length of the list shown in the sidebar for the current tab
    pub fn current_list_len(&self) -> usize {
        match self.ui.current_tab {
            Tab::Upcoming => self.upcoming_contacts().len(),
            Tab::Contacts => self.filtered_contacts().len(),
            Tab::Gifts => self.filtered_gift_plans().len(),
        }
    }

    pub fn selected_contact(&self) -> Option<Contact> {
        match self.ui.current_tab {
            Tab::Upcoming => self.upcoming_contacts().get(self.ui.selected_index).cloned(),
            Tab::Contacts => self.filtered_contacts().get(self.ui.selected_index).cloned(),
            Tab::Gifts => None,
        }
    }

    pub fn selected_gift_plan(&self) -> Option<GiftPlan> {
        match self.ui.current_tab {
            Tab::Gifts => self.filtered_gift_plans().get(self.ui.selected_index).cloned(),
            _ => None,
        }
    }

    pub fn selected_item(&self) -> Option<SelectedItem> {
        match self.ui.current_tab {
            Tab::Gifts => self.selected_gift_plan().map(SelectedItem::Gift),
            _ => self.selected_contact().map(SelectedItem::Contact),
        }
    }

    pub fn adjust_selected_index(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            self.ui.selected_index = 0;
        } else if self.ui.selected_index >= len {
            self.ui.selected_index = len - 1;
        }
        self.sync_list_state();
    }

    /// Sync ListState with selected_index for proper scrolling
    pub fn sync_list_state(&mut self) {
        self.ui.list_state.select(Some(self.ui.selected_index));
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
            self.ui.item_view_scroll = 0;
            self.sync_list_state();
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.ui.selected_index + 1 < self.current_list_len() {
            self.ui.selected_index += 1;
            self.ui.item_view_scroll = 0;
            self.sync_list_state();
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.ui.sidebar_state = match self.ui.sidebar_state {
            SidebarState::Expanded => SidebarState::Collapsed,
            SidebarState::Collapsed => SidebarState::Expanded,
        };
    }

    /// Switch to a new tab and reset selection to the top
    pub fn switch_tab(&mut self, new_tab: Tab) {
        self.ui.current_tab = new_tab;
        self.ui.selected_index = 0;
        self.ui.item_view_scroll = 0;
        self.adjust_selected_index();
    }

    pub fn next_tab(&mut self) {
        let next = match self.ui.current_tab {
            Tab::Upcoming => Tab::Contacts,
            Tab::Contacts => Tab::Gifts,
            Tab::Gifts => Tab::Upcoming,
        };
        self.switch_tab(next);
    }

    pub fn prev_tab(&mut self) {
        let prev = match self.ui.current_tab {
            Tab::Upcoming => Tab::Gifts,
            Tab::Contacts => Tab::Upcoming,
            Tab::Gifts => Tab::Contacts,
        };
        self.switch_tab(prev);
    }

    /// Cycle the dashboard window through 7 -> 30 -> 90 -> 7 days
    pub fn cycle_window(&mut self) {
        let pos = WINDOW_CHOICES
            .iter()
            .position(|&w| w == self.window_days)
            .unwrap_or(0);
        self.window_days = WINDOW_CHOICES[(pos + 1) % WINDOW_CHOICES.len()];
        self.adjust_selected_index();
        self.set_status_message(format!("Showing next {} days", self.window_days));
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.ui.mode = Mode::Search;
        self.search.query.clear();
    }

    pub fn exit_search_mode(&mut self) {
        self.ui.mode = Mode::View;
        self.search.query.clear();
        self.adjust_selected_index();
    }

    pub fn add_to_search(&mut self, ch: char) {
        self.search.query.push(ch);
        self.ui.selected_index = 0; // Reset to top when searching
        self.sync_list_state();
    }

    pub fn remove_from_search(&mut self) {
        self.search.query.pop();
        self.ui.selected_index = 0;
        self.sync_list_state();
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    /// Open a blank form appropriate for the current tab
    pub fn enter_create_mode(&mut self) {
        let form = match self.ui.current_tab {
            Tab::Upcoming | Tab::Contacts => ItemForm::Contact(ContactForm {
                current_field: ContactField::Name,
                name: Editor::new(),
                month: Editor::new(),
                day: Editor::new(),
                year: Editor::new(),
                notes: Editor::new(),
                editing_id: None,
            }),
            Tab::Gifts => {
                // Only contacts without an existing plan are candidates
                let contact_choices: Vec<(String, String)> = self
                    .contacts
                    .iter()
                    .filter(|c| !self.gift_plans.iter().any(|p| p.contact_id == c.id))
                    .map(|c| (c.id.clone(), c.name.clone()))
                    .collect();
                if contact_choices.is_empty() {
                    self.set_status_message(
                        "Every contact already has a gift plan (or there are no contacts)"
                            .to_string(),
                    );
                    return;
                }
                ItemForm::Gift(GiftForm {
                    current_field: GiftField::Contact,
                    contact_choices,
                    contact_index: 0,
                    idea: Editor::new(),
                    budget: Editor::new(),
                    notes: Editor::new(),
                    status: GiftStatus::Planned,
                    yearly_recurring: false,
                    editing: false,
                })
            }
        };
        self.form.create_form = Some(form);
        self.ui.mode = Mode::Create;
    }

    /// Open a form pre-filled with the selected item
    pub fn enter_edit_mode(&mut self) {
        let Some(item) = self.selected_item() else {
            self.set_status_message("No item selected".to_string());
            return;
        };
        let form = match item {
            SelectedItem::Contact(contact) => ItemForm::Contact(ContactForm {
                current_field: ContactField::Name,
                name: Editor::from_string(contact.name.clone()),
                month: Editor::from_string(contact.birth_month.to_string()),
                day: Editor::from_string(contact.birth_day.to_string()),
                year: Editor::from_string(
                    contact.birth_year.map(|y| y.to_string()).unwrap_or_default(),
                ),
                notes: Editor::from_string(contact.notes.clone().unwrap_or_default()),
                editing_id: Some(contact.id),
            }),
            SelectedItem::Gift(plan) => {
                let name = self
                    .contact_name(&plan.contact_id)
                    .unwrap_or("(unknown)")
                    .to_string();
                ItemForm::Gift(GiftForm {
                    current_field: GiftField::Idea,
                    contact_choices: vec![(plan.contact_id.clone(), name)],
                    contact_index: 0,
                    idea: Editor::from_string(plan.gift_idea.clone()),
                    budget: Editor::from_string(
                        plan.budget.map(|b| b.to_string()).unwrap_or_default(),
                    ),
                    notes: Editor::from_string(plan.notes.clone().unwrap_or_default()),
                    status: plan.status,
                    yearly_recurring: plan.yearly_recurring,
                    editing: true,
                })
            }
        };
        self.form.create_form = Some(form);
        self.ui.mode = Mode::Create;
    }

    pub fn exit_create_mode(&mut self) {
        self.form.create_form = None;
        self.ui.mode = Mode::View;
    }

    pub fn navigate_form_field(&mut self, forward: bool) {
        if let Some(ref mut form) = self.form.create_form {
            match form {
                ItemForm::Contact(contact_form) => {
                    let current = contact_form.current_field;
                    contact_form.current_field = match (current, forward) {
                        (ContactField::Name, true) => ContactField::Month,
                        (ContactField::Month, true) => ContactField::Day,
                        (ContactField::Day, true) => ContactField::Year,
                        (ContactField::Year, true) => ContactField::Notes,
                        (ContactField::Notes, true) => ContactField::Name, // Wrap around
                        (ContactField::Name, false) => ContactField::Notes, // Wrap around
                        (ContactField::Month, false) => ContactField::Name,
                        (ContactField::Day, false) => ContactField::Month,
                        (ContactField::Year, false) => ContactField::Day,
                        (ContactField::Notes, false) => ContactField::Year,
                    };
                }
                ItemForm::Gift(gift_form) => {
                    let current = gift_form.current_field;
                    let next = match (current, forward) {
                        (GiftField::Contact, true) => GiftField::Idea,
                        (GiftField::Idea, true) => GiftField::Budget,
                        (GiftField::Budget, true) => GiftField::Notes,
                        (GiftField::Notes, true) => GiftField::Status,
                        (GiftField::Status, true) => GiftField::Recurring,
                        (GiftField::Recurring, true) => GiftField::Contact, // Wrap around
                        (GiftField::Contact, false) => GiftField::Recurring, // Wrap around
                        (GiftField::Idea, false) => GiftField::Contact,
                        (GiftField::Budget, false) => GiftField::Idea,
                        (GiftField::Notes, false) => GiftField::Budget,
                        (GiftField::Status, false) => GiftField::Notes,
                        (GiftField::Recurring, false) => GiftField::Status,
                    };
                    // Contact is fixed while editing an existing plan
                    gift_form.current_field = if gift_form.editing && next == GiftField::Contact {
                        if forward { GiftField::Idea } else { GiftField::Recurring }
                    } else {
                        next
                    };
                }
            }
        }
    }

    /// Editor for the currently focused text field, if any
    pub fn get_current_form_editor(&mut self) -> Option<&mut Editor> {
        match self.form.create_form {
            Some(ItemForm::Contact(ref mut contact_form)) => match contact_form.current_field {
                ContactField::Name => Some(&mut contact_form.name),
                ContactField::Month => Some(&mut contact_form.month),
                ContactField::Day => Some(&mut contact_form.day),
                ContactField::Year => Some(&mut contact_form.year),
                ContactField::Notes => Some(&mut contact_form.notes),
            },
            Some(ItemForm::Gift(ref mut gift_form)) => match gift_form.current_field {
                GiftField::Idea => Some(&mut gift_form.idea),
                GiftField::Budget => Some(&mut gift_form.budget),
                GiftField::Notes => Some(&mut gift_form.notes),
                GiftField::Contact | GiftField::Status | GiftField::Recurring => None,
            },
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let db = Database::open_in_memory().unwrap();
        App::new(Config::default(), db).unwrap()
    }

    fn add_contact(app: &mut App, name: &str, month: u32, day: u32) -> String {
        let contact = Contact::new(name.to_string(), month, day);
        let id = contact.id.clone();
        app.database.insert_contact(&contact).unwrap();
        app.load_data().unwrap();
        id
    }

    #[test]
    fn test_first_run_starts_in_setup_mode() {
        let app = test_app();
        assert_eq!(app.ui.mode, Mode::Setup);
    }

    #[test]
    fn test_profile_present_skips_setup() {
        let db = Database::open_in_memory().unwrap();
        db.save_profile(&UserProfile {
            name: "Sam".to_string(),
        })
        .unwrap();
        let app = App::new(Config::default(), db).unwrap();
        assert_eq!(app.ui.mode, Mode::View);
    }

    #[test]
    fn test_cycle_window_walks_choices() {
        let mut app = test_app();
        assert_eq!(app.window_days, 30);
        app.cycle_window();
        assert_eq!(app.window_days, 90);
        app.cycle_window();
        assert_eq!(app.window_days, 7);
        app.cycle_window();
        assert_eq!(app.window_days, 30);
    }

    #[test]
    fn test_upcoming_respects_window() {
        let mut app = test_app();
        let soon = app.today.checked_add_days(chrono::Days::new(5)).unwrap();
        let far = app.today.checked_add_days(chrono::Days::new(60)).unwrap();
        use chrono::Datelike;
        add_contact(&mut app, "Soon", soon.month(), soon.day());
        add_contact(&mut app, "Far", far.month(), far.day());

        app.window_days = 7;
        let names: Vec<String> = app.upcoming_contacts().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Soon"]);

        app.window_days = 90;
        let names: Vec<String> = app.upcoming_contacts().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Soon", "Far"]);
    }

    #[test]
    fn test_search_filters_contacts() {
        let mut app = test_app();
        add_contact(&mut app, "Alice", 6, 1);
        add_contact(&mut app, "Bob", 7, 2);
        app.switch_tab(Tab::Contacts);
        app.enter_search_mode();
        app.add_to_search('a');
        app.add_to_search('l');
        let names: Vec<String> = app.filtered_contacts().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Alice"]);
        app.exit_search_mode();
        assert_eq!(app.filtered_contacts().len(), 2);
    }

    #[test]
    fn test_gift_form_excludes_contacts_with_plans() {
        let mut app = test_app();
        let id_a = add_contact(&mut app, "Alice", 6, 1);
        add_contact(&mut app, "Bob", 7, 2);
        app.database
            .insert_gift_plan(&GiftPlan::new(id_a, "Book".to_string()))
            .unwrap();
        app.load_data().unwrap();

        app.switch_tab(Tab::Gifts);
        app.enter_create_mode();
        match app.form.create_form {
            Some(ItemForm::Gift(ref form)) => {
                let names: Vec<&str> =
                    form.contact_choices.iter().map(|(_, n)| n.as_str()).collect();
                assert_eq!(names, vec!["Bob"]);
            }
            _ => panic!("expected gift form"),
        }
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut app = test_app();
        add_contact(&mut app, "Alice", 6, 1);
        add_contact(&mut app, "Bob", 7, 2);
        app.switch_tab(Tab::Contacts);
        app.move_selection_down();
        assert_eq!(app.ui.selected_index, 1);
        app.move_selection_down();
        assert_eq!(app.ui.selected_index, 1);
        app.move_selection_up();
        app.move_selection_up();
        assert_eq!(app.ui.selected_index, 0);
    }
}
