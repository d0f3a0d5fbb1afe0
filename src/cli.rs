use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use crate::database::Database;
use crate::database::DatabaseError;
use crate::dates;
use crate::models::{Contact, GiftPlan};
use crate::utils::now_nanos;

#[derive(Parser)]
#[command(name = "bdg")]
#[command(about = "Birthdays & Gifts - track birthdays and gift plans in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Quickly add a new contact
    AddContact {
        /// Contact name
        name: String,
        /// Birth month (1-12)
        #[arg(long)]
        month: u32,
        /// Birth day (1-31, must be valid for the month)
        #[arg(long)]
        day: u32,
        /// Birth year (optional, 1900..current year)
        #[arg(long)]
        year: Option<i32>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Quickly add a gift plan for a contact
    AddGift {
        /// Contact id or exact name
        contact: String,
        /// Gift idea
        idea: String,
        /// Budget (non-negative, whole currency units)
        #[arg(long)]
        budget: Option<i64>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Regenerate the plan yearly after it is marked Sent
        #[arg(long)]
        recurring: bool,
    },
    /// List upcoming birthdays within a window
    Upcoming {
        /// Window size in days
        #[arg(long, default_value_t = 30)]
        days: i64,
    },
    /// Dump all contacts and gift plans as JSON to stdout
    Export,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("No contact matching '{0}' (pass an id or an exact name)")]
    ContactNotFound(String),
    #[error("Failed to serialize export: {0}")]
    ExportError(#[from] serde_json::Error),
}

/// Handle the add-contact command
pub fn handle_add_contact(
    name: String,
    month: u32,
    day: u32,
    year: Option<i32>,
    notes: Option<String>,
    db: &Database,
) -> Result<(), CliError> {
    let mut contact = Contact::new(name, month, day);
    contact.birth_year = year;
    contact.notes = notes;

    // Range validation happens at the database write boundary
    db.insert_contact(&contact)?;
    println!("Contact created successfully (id: {})", contact.id);

    Ok(())
}

/// Handle the add-gift command
pub fn handle_add_gift(
    contact: String,
    idea: String,
    budget: Option<i64>,
    notes: Option<String>,
    recurring: bool,
    db: &Database,
) -> Result<(), CliError> {
    let found = db
        .find_contact(&contact)?
        .ok_or_else(|| CliError::ContactNotFound(contact.clone()))?;

    // Same policy as the interactive form: the plan targets the
    // contact's next birthday as of the save
    let today = chrono::Local::now().date_naive();
    let mut plan = GiftPlan::new(found.id, idea);
    plan.planned_date = dates::occurrence_nanos(found.birth_month, found.birth_day, today);
    plan.budget = budget;
    plan.notes = notes;
    plan.yearly_recurring = recurring;

    db.insert_gift_plan(&plan)?;
    println!("Gift plan created successfully for {}", found.name);

    Ok(())
}

/// Handle the upcoming command: print birthdays within the window,
/// soonest first
pub fn handle_upcoming(days: i64, db: &Database) -> Result<(), CliError> {
    let today = chrono::Local::now().date_naive();
    let contacts = db.upcoming_contacts(days, today)?;

    if contacts.is_empty() {
        println!("No birthdays in the next {} days", days);
        return Ok(());
    }

    for contact in contacts {
        let days_until = dates::days_until(contact.birth_month, contact.birth_day, today);
        let label =
            dates::format_birthday_label(contact.birth_month, contact.birth_day, contact.birth_year);
        let turning = dates::age_at_next_birthday(
            contact.birth_year,
            contact.birth_month,
            contact.birth_day,
            today,
        )
        .map(|age| format!(" (turning {})", age))
        .unwrap_or_default();

        if days_until == 0 {
            println!("today     {} - {}{}", contact.name, label, turning);
        } else {
            println!(
                "{:>3} day{}  {} - {}{}",
                days_until,
                if days_until == 1 { " " } else { "s" },
                contact.name,
                label,
                turning
            );
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct Export {
    exported_at: i64,
    contacts: Vec<Contact>,
    gift_plans: Vec<GiftPlan>,
}

/// Handle the export command: dump everything as JSON to stdout
pub fn handle_export(db: &Database) -> Result<(), CliError> {
    let export = Export {
        exported_at: now_nanos(),
        contacts: db.get_all_contacts()?,
        gift_plans: db.get_all_gift_plans()?,
    };

    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_contact_inserts_row() {
        let db = Database::open_in_memory().unwrap();
        handle_add_contact(
            "Alice".to_string(),
            6,
            1,
            Some(1990),
            None,
            &db,
        )
        .unwrap();

        let contacts = db.get_all_contacts().unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "Alice");
    }

    #[test]
    fn test_add_gift_resolves_contact_by_name() {
        let db = Database::open_in_memory().unwrap();
        handle_add_contact("Bob".to_string(), 3, 14, None, None, &db).unwrap();

        handle_add_gift(
            "Bob".to_string(),
            "Pie".to_string(),
            Some(15),
            None,
            true,
            &db,
        )
        .unwrap();

        let plans = db.get_all_gift_plans().unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].gift_idea, "Pie");
        assert!(plans[0].yearly_recurring);

        // The plan targets the contact's next birthday, not the creation
        // instant
        let today = chrono::Local::now().date_naive();
        assert_eq!(
            plans[0].planned_date,
            dates::occurrence_nanos(3, 14, today)
        );
    }

    #[test]
    fn test_add_gift_unknown_contact() {
        let db = Database::open_in_memory().unwrap();
        let result = handle_add_gift(
            "nobody".to_string(),
            "Pie".to_string(),
            None,
            None,
            false,
            &db,
        );
        assert!(matches!(result, Err(CliError::ContactNotFound(_))));
    }
}
