use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

use crate::dates;
use crate::models::{Contact, GiftPlan, GiftStatus, UserProfile};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("{0}")]
    InvalidInput(String),
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;

        let db = Database { conn };
        db.initialize_schema()?;

        Ok(db)
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS contacts (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                birth_month     INTEGER NOT NULL,
                birth_day       INTEGER NOT NULL,
                birth_year      INTEGER,
                notes           TEXT,
                created_at      INTEGER NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;

        // One plan per contact: contact_id is the key
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS gift_plans (
                contact_id          TEXT PRIMARY KEY,
                gift_idea           TEXT NOT NULL,
                planned_date        INTEGER NOT NULL,
                budget              INTEGER,
                notes               TEXT,
                status              TEXT NOT NULL DEFAULT 'Planned',
                yearly_recurring    INTEGER DEFAULT 0,
                created_at          INTEGER NOT NULL,
                updated_at          INTEGER NOT NULL
            )",
            [],
        )?;

        // Single-row profile table
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS profile (
                id              INTEGER PRIMARY KEY CHECK (id = 1),
                name            TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_contacts_name ON contacts(name)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_gift_plans_updated_at ON gift_plans(updated_at)",
            [],
        )?;

        Ok(())
    }

    /// Reject contacts that violate the data-entry constraints: non-empty
    /// name, month 1-12, day within the month's day-count table (Feb caps
    /// at 29), birth year 1900..=current year.
    fn validate_contact(contact: &Contact) -> Result<(), DatabaseError> {
        if contact.name.trim().is_empty() {
            return Err(DatabaseError::InvalidInput(
                "Contact name must not be empty".to_string(),
            ));
        }
        if !(1..=12).contains(&contact.birth_month) {
            return Err(DatabaseError::InvalidInput(format!(
                "Birth month must be 1-12, got {}",
                contact.birth_month
            )));
        }
        let max_day = dates::days_in_month(contact.birth_month);
        if !(1..=max_day).contains(&contact.birth_day) {
            return Err(DatabaseError::InvalidInput(format!(
                "Birth day must be 1-{} for month {}, got {}",
                max_day, contact.birth_month, contact.birth_day
            )));
        }
        if let Some(year) = contact.birth_year {
            let current_year = chrono::Utc::now().year();
            if !(1900..=current_year).contains(&year) {
                return Err(DatabaseError::InvalidInput(format!(
                    "Birth year must be between 1900 and {}, got {}",
                    current_year, year
                )));
            }
        }
        Ok(())
    }

    fn validate_gift_plan(plan: &GiftPlan) -> Result<(), DatabaseError> {
        if plan.gift_idea.trim().is_empty() {
            return Err(DatabaseError::InvalidInput(
                "Gift idea must not be empty".to_string(),
            ));
        }
        if let Some(budget) = plan.budget {
            if budget < 0 {
                return Err(DatabaseError::InvalidInput(format!(
                    "Budget must be non-negative, got {}",
                    budget
                )));
            }
        }
        Ok(())
    }

    /// Insert a contact into the database
    pub fn insert_contact(&self, contact: &Contact) -> Result<(), DatabaseError> {
        Self::validate_contact(contact)?;
        self.conn.execute(
            "INSERT INTO contacts (id, name, birth_month, birth_day, birth_year, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                contact.id,
                contact.name,
                contact.birth_month,
                contact.birth_day,
                contact.birth_year,
                contact.notes,
                contact.created_at,
                contact.updated_at
            ],
        )?;
        Ok(())
    }

    /// Helper function to map a row to a Contact
    fn row_to_contact(row: &rusqlite::Row) -> Result<Contact, rusqlite::Error> {
        Ok(Contact {
            id: row.get(0)?,
            name: row.get(1)?,
            birth_month: row.get(2)?,
            birth_day: row.get(3)?,
            birth_year: row.get(4)?,
            notes: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    /// Get all contacts ordered by name
    pub fn get_all_contacts(&self) -> Result<Vec<Contact>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, birth_month, birth_day, birth_year, notes, created_at, updated_at
             FROM contacts ORDER BY name COLLATE NOCASE ASC",
        )?;
        let contacts = stmt
            .query_map([], Self::row_to_contact)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(contacts)
    }

    /// Get a single contact by ID
    pub fn get_contact(&self, id: &str) -> Result<Contact, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, birth_month, birth_day, birth_year, notes, created_at, updated_at
             FROM contacts WHERE id = ?1",
        )?;

        stmt.query_row(rusqlite::params![id], Self::row_to_contact)
            .map_err(DatabaseError::from)
    }

    /// Look up a contact by id, falling back to an exact name match.
    /// Used by the quick-entry CLI.
    pub fn find_contact(&self, id_or_name: &str) -> Result<Option<Contact>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, birth_month, birth_day, birth_year, notes, created_at, updated_at
             FROM contacts WHERE id = ?1 OR name = ?1 LIMIT 1",
        )?;

        match stmt.query_row(rusqlite::params![id_or_name], Self::row_to_contact) {
            Ok(contact) => Ok(Some(contact)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// Update an existing contact
    pub fn update_contact(&self, contact: &Contact) -> Result<(), DatabaseError> {
        Self::validate_contact(contact)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE contacts SET name = ?1, birth_month = ?2, birth_day = ?3,
             birth_year = ?4, notes = ?5, updated_at = ?6 WHERE id = ?7",
            rusqlite::params![
                contact.name,
                contact.birth_month,
                contact.birth_day,
                contact.birth_year,
                contact.notes,
                contact.updated_at,
                contact.id
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a contact by ID.
    /// The contact's gift plan goes with it in the same transaction.
    pub fn delete_contact(&self, id: &str) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM gift_plans WHERE contact_id = ?1",
            rusqlite::params![id],
        )?;
        tx.execute("DELETE FROM contacts WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(())
    }

    /// Contacts whose next birthday falls within `days_ahead` days of
    /// `today`, soonest first (ties broken by name). Day arithmetic is
    /// delegated to the date engine so the SQL layer stays calendar-free.
    pub fn upcoming_contacts(
        &self,
        days_ahead: i64,
        today: NaiveDate,
    ) -> Result<Vec<Contact>, DatabaseError> {
        let mut contacts: Vec<Contact> = self
            .get_all_contacts()?
            .into_iter()
            .filter(|c| dates::days_until(c.birth_month, c.birth_day, today) <= days_ahead)
            .collect();
        contacts.sort_by(|a, b| {
            dates::days_until(a.birth_month, a.birth_day, today)
                .cmp(&dates::days_until(b.birth_month, b.birth_day, today))
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(contacts)
    }

    /// Insert a gift plan. The contact must exist and must not already
    /// have a plan.
    pub fn insert_gift_plan(&self, plan: &GiftPlan) -> Result<(), DatabaseError> {
        Self::validate_gift_plan(plan)?;
        // Existence check is by id only; name matching is a CLI
        // convenience that does not belong here
        match self.get_contact(&plan.contact_id) {
            Ok(_) => {}
            Err(DatabaseError::SqliteError(rusqlite::Error::QueryReturnedNoRows)) => {
                return Err(DatabaseError::InvalidInput(format!(
                    "No contact with id {}",
                    plan.contact_id
                )));
            }
            Err(e) => return Err(e),
        }
        if self.get_gift_plan(&plan.contact_id)?.is_some() {
            return Err(DatabaseError::InvalidInput(format!(
                "Contact {} already has a gift plan",
                plan.contact_id
            )));
        }
        self.conn.execute(
            "INSERT INTO gift_plans (contact_id, gift_idea, planned_date, budget, notes, status, yearly_recurring, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                plan.contact_id,
                plan.gift_idea,
                plan.planned_date,
                plan.budget,
                plan.notes,
                plan.status.as_str(),
                if plan.yearly_recurring { 1 } else { 0 },
                plan.created_at,
                plan.updated_at
            ],
        )?;
        Ok(())
    }

    /// Helper function to map a row to a GiftPlan
    fn row_to_gift_plan(row: &rusqlite::Row) -> Result<GiftPlan, rusqlite::Error> {
        let status: String = row.get(5)?;
        Ok(GiftPlan {
            contact_id: row.get(0)?,
            gift_idea: row.get(1)?,
            planned_date: row.get(2)?,
            budget: row.get(3)?,
            notes: row.get(4)?,
            status: GiftStatus::parse(&status),
            yearly_recurring: row.get::<_, i64>(6)? != 0,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    /// Get all gift plans, most recently updated first
    pub fn get_all_gift_plans(&self) -> Result<Vec<GiftPlan>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT contact_id, gift_idea, planned_date, budget, notes, status, yearly_recurring, created_at, updated_at
             FROM gift_plans ORDER BY updated_at DESC",
        )?;
        let plans = stmt
            .query_map([], Self::row_to_gift_plan)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plans)
    }

    /// Get the gift plan for a contact, if any
    pub fn get_gift_plan(&self, contact_id: &str) -> Result<Option<GiftPlan>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT contact_id, gift_idea, planned_date, budget, notes, status, yearly_recurring, created_at, updated_at
             FROM gift_plans WHERE contact_id = ?1",
        )?;

        match stmt.query_row(rusqlite::params![contact_id], Self::row_to_gift_plan) {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// Update the gift plan keyed by its contact id
    pub fn update_gift_plan(&self, plan: &GiftPlan) -> Result<(), DatabaseError> {
        Self::validate_gift_plan(plan)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE gift_plans SET gift_idea = ?1, planned_date = ?2, budget = ?3,
             notes = ?4, status = ?5, yearly_recurring = ?6, updated_at = ?7 WHERE contact_id = ?8",
            rusqlite::params![
                plan.gift_idea,
                plan.planned_date,
                plan.budget,
                plan.notes,
                plan.status.as_str(),
                if plan.yearly_recurring { 1 } else { 0 },
                plan.updated_at,
                plan.contact_id
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete the gift plan for a contact
    pub fn delete_gift_plan(&self, contact_id: &str) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM gift_plans WHERE contact_id = ?1",
            rusqlite::params![contact_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Get the saved user profile, if the setup step has run
    pub fn get_profile(&self) -> Result<Option<UserProfile>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT name FROM profile WHERE id = 1")?;

        match stmt.query_row([], |row| Ok(UserProfile { name: row.get(0)? })) {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// Save (or replace) the single user profile row
    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), DatabaseError> {
        if profile.name.trim().is_empty() {
            return Err(DatabaseError::InvalidInput(
                "Profile name must not be empty".to_string(),
            ));
        }
        self.conn.execute(
            "INSERT INTO profile (id, name) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            rusqlite::params![profile.name],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::now_nanos;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn sample_contact(name: &str, month: u32, day: u32) -> Contact {
        Contact::new(name.to_string(), month, day)
    }

    #[test]
    fn test_contact_crud() {
        let db = test_db();
        let mut contact = sample_contact("Alice", 6, 1);
        contact.birth_year = Some(1990);
        contact.notes = Some("Likes tea".to_string());
        db.insert_contact(&contact).unwrap();

        let loaded = db.get_contact(&contact.id).unwrap();
        assert_eq!(loaded.name, "Alice");
        assert_eq!(loaded.birth_year, Some(1990));
        assert_eq!(loaded.notes.as_deref(), Some("Likes tea"));

        let mut updated = loaded.clone();
        updated.name = "Alice B".to_string();
        updated.updated_at = now_nanos();
        db.update_contact(&updated).unwrap();
        assert_eq!(db.get_contact(&contact.id).unwrap().name, "Alice B");

        db.delete_contact(&contact.id).unwrap();
        assert!(db.get_contact(&contact.id).is_err());
    }

    #[test]
    fn test_contacts_ordered_by_name() {
        let db = test_db();
        db.insert_contact(&sample_contact("zoe", 1, 1)).unwrap();
        db.insert_contact(&sample_contact("Bob", 2, 2)).unwrap();
        db.insert_contact(&sample_contact("alice", 3, 3)).unwrap();

        let names: Vec<String> = db
            .get_all_contacts()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["alice", "Bob", "zoe"]);
    }

    #[test]
    fn test_contact_validation() {
        let db = test_db();
        let empty_name = sample_contact("   ", 1, 1);
        assert!(matches!(
            db.insert_contact(&empty_name),
            Err(DatabaseError::InvalidInput(_))
        ));

        let bad_month = sample_contact("X", 13, 1);
        assert!(db.insert_contact(&bad_month).is_err());

        // Feb 30 is out even with the leap-tolerant table
        let bad_day = sample_contact("X", 2, 30);
        assert!(db.insert_contact(&bad_day).is_err());

        // Feb 29 is always accepted
        let leap_day = sample_contact("X", 2, 29);
        assert!(db.insert_contact(&leap_day).is_ok());

        let mut old_year = sample_contact("Y", 1, 1);
        old_year.birth_year = Some(1899);
        assert!(db.insert_contact(&old_year).is_err());

        let mut future_year = sample_contact("Z", 1, 1);
        future_year.birth_year = Some(chrono::Utc::now().year() + 1);
        assert!(db.insert_contact(&future_year).is_err());
    }

    #[test]
    fn test_find_contact_by_id_or_name() {
        let db = test_db();
        let contact = sample_contact("Carol", 4, 5);
        db.insert_contact(&contact).unwrap();

        assert!(db.find_contact(&contact.id).unwrap().is_some());
        assert!(db.find_contact("Carol").unwrap().is_some());
        assert!(db.find_contact("nobody").unwrap().is_none());
    }

    #[test]
    fn test_one_gift_plan_per_contact() {
        let db = test_db();
        let contact = sample_contact("Dave", 7, 4);
        db.insert_contact(&contact).unwrap();

        let plan = GiftPlan::new(contact.id.clone(), "Book".to_string());
        db.insert_gift_plan(&plan).unwrap();

        let second = GiftPlan::new(contact.id.clone(), "Socks".to_string());
        assert!(matches!(
            db.insert_gift_plan(&second),
            Err(DatabaseError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_gift_plan_requires_contact() {
        let db = test_db();
        let plan = GiftPlan::new("contact-missing".to_string(), "Book".to_string());
        assert!(matches!(
            db.insert_gift_plan(&plan),
            Err(DatabaseError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_gift_plan_rejects_contact_name_as_id() {
        let db = test_db();
        let contact = sample_contact("Frank", 11, 2);
        db.insert_contact(&contact).unwrap();

        // A name is not an id, even though the CLI resolves either
        let plan = GiftPlan::new("Frank".to_string(), "Scarf".to_string());
        assert!(matches!(
            db.insert_gift_plan(&plan),
            Err(DatabaseError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_gift_plan_update_and_status() {
        let db = test_db();
        let contact = sample_contact("Erin", 9, 10);
        db.insert_contact(&contact).unwrap();

        let mut plan = GiftPlan::new(contact.id.clone(), "Headphones".to_string());
        plan.budget = Some(120);
        plan.yearly_recurring = true;
        db.insert_gift_plan(&plan).unwrap();

        plan.status = plan.status.advance();
        plan.updated_at = now_nanos();
        db.update_gift_plan(&plan).unwrap();

        let loaded = db.get_gift_plan(&contact.id).unwrap().unwrap();
        assert_eq!(loaded.status, GiftStatus::Ordered);
        assert_eq!(loaded.budget, Some(120));
        assert!(loaded.yearly_recurring);
    }

    #[test]
    fn test_gift_plan_rejects_negative_budget() {
        let db = test_db();
        let contact = sample_contact("Finn", 2, 14);
        db.insert_contact(&contact).unwrap();

        let mut plan = GiftPlan::new(contact.id.clone(), "Chocolate".to_string());
        plan.budget = Some(-5);
        assert!(matches!(
            db.insert_gift_plan(&plan),
            Err(DatabaseError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_delete_contact_cascades_to_gift_plan() {
        let db = test_db();
        let contact = sample_contact("Gail", 11, 30);
        db.insert_contact(&contact).unwrap();
        db.insert_gift_plan(&GiftPlan::new(contact.id.clone(), "Scarf".to_string()))
            .unwrap();

        db.delete_contact(&contact.id).unwrap();
        assert!(db.get_gift_plan(&contact.id).unwrap().is_none());
        assert!(db.get_all_gift_plans().unwrap().is_empty());
    }

    #[test]
    fn test_upcoming_contacts_window() {
        let db = test_db();
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        db.insert_contact(&sample_contact("Today", 3, 15)).unwrap();
        db.insert_contact(&sample_contact("Soon", 3, 20)).unwrap();
        db.insert_contact(&sample_contact("Later", 6, 1)).unwrap();
        // Passed yesterday, wraps 364 days out
        db.insert_contact(&sample_contact("NextYear", 3, 14)).unwrap();

        let week: Vec<String> = db
            .upcoming_contacts(7, today)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(week, vec!["Today", "Soon"]);

        let quarter: Vec<String> = db
            .upcoming_contacts(90, today)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(quarter, vec!["Today", "Soon", "Later"]);

        // A wide enough window picks up the wrapped birthday, last
        let year = db.upcoming_contacts(365, today).unwrap();
        assert_eq!(year.last().unwrap().name, "NextYear");
    }

    #[test]
    fn test_profile_upsert() {
        let db = test_db();
        assert!(db.get_profile().unwrap().is_none());

        db.save_profile(&UserProfile::new("Sam".to_string())).unwrap();
        assert_eq!(db.get_profile().unwrap().unwrap().name, "Sam");

        db.save_profile(&UserProfile::new("Sam R".to_string())).unwrap();
        assert_eq!(db.get_profile().unwrap().unwrap().name, "Sam R");

        assert!(db.save_profile(&UserProfile::new("  ".to_string())).is_err());
    }
}
