use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{generate_contact_id, now_nanos};

/// Gift plan progression. Stored as text in the database; unknown text
/// parses back as Planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GiftStatus {
    Planned,
    Ordered,
    Sent,
}

impl GiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftStatus::Planned => "Planned",
            GiftStatus::Ordered => "Ordered",
            GiftStatus::Sent => "Sent",
        }
    }

    /// Lenient parse: anything unrecognized falls back to Planned.
    pub fn parse(s: &str) -> Self {
        match s {
            "Ordered" => GiftStatus::Ordered,
            "Sent" => GiftStatus::Sent,
            _ => GiftStatus::Planned,
        }
    }

    /// Forward transition Planned -> Ordered -> Sent. Sent is terminal.
    pub fn advance(self) -> Self {
        match self {
            GiftStatus::Planned => GiftStatus::Ordered,
            GiftStatus::Ordered => GiftStatus::Sent,
            GiftStatus::Sent => GiftStatus::Sent,
        }
    }

    pub const ALL: [GiftStatus; 3] = [GiftStatus::Planned, GiftStatus::Ordered, GiftStatus::Sent];
}

impl fmt::Display for GiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub birth_month: u32,          // 1-12
    pub birth_day: u32,            // 1..=days_in_month(birth_month)
    pub birth_year: Option<i32>,   // 1900..=current year
    pub notes: Option<String>,
    pub created_at: i64,           // Unix nanoseconds
    pub updated_at: i64,
}

impl Contact {
    pub fn new(name: String, birth_month: u32, birth_day: u32) -> Self {
        let now = now_nanos();
        Self {
            id: generate_contact_id(),
            name,
            birth_month,
            birth_day,
            birth_year: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One gift plan per contact, keyed by the contact's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftPlan {
    pub contact_id: String,
    pub gift_idea: String,
    pub planned_date: i64,         // Unix nanoseconds, stamped at save time
    pub budget: Option<i64>,       // non-negative
    pub notes: Option<String>,
    pub status: GiftStatus,
    pub yearly_recurring: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl GiftPlan {
    pub fn new(contact_id: String, gift_idea: String) -> Self {
        let now = now_nanos();
        Self {
            contact_id,
            gift_idea,
            planned_date: now,
            budget: None,
            notes: None,
            status: GiftStatus::Planned,
            yearly_recurring: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
}

impl UserProfile {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in GiftStatus::ALL {
            assert_eq!(GiftStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_status_lenient_parse() {
        assert_eq!(GiftStatus::parse("garbage"), GiftStatus::Planned);
        assert_eq!(GiftStatus::parse(""), GiftStatus::Planned);
    }

    #[test]
    fn test_status_advance_is_monotonic() {
        assert_eq!(GiftStatus::Planned.advance(), GiftStatus::Ordered);
        assert_eq!(GiftStatus::Ordered.advance(), GiftStatus::Sent);
        assert_eq!(GiftStatus::Sent.advance(), GiftStatus::Sent);
    }

    #[test]
    fn test_contact_new_stamps_timestamps() {
        let contact = Contact::new("Alice".to_string(), 6, 1);
        assert_eq!(contact.created_at, contact.updated_at);
        assert!(contact.created_at > 0);
        assert!(contact.id.starts_with("contact-"));
    }

    #[test]
    fn test_contact_ids_are_unique() {
        let a = Contact::new("A".to_string(), 1, 1);
        let b = Contact::new("B".to_string(), 1, 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_gift_plan_defaults() {
        let plan = GiftPlan::new("contact-1".to_string(), "Book".to_string());
        assert_eq!(plan.status, GiftStatus::Planned);
        assert!(!plan.yearly_recurring);
        assert!(plan.budget.is_none());
        assert_eq!(plan.created_at, plan.updated_at);
    }
}
