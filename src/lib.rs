pub mod config;
pub mod database;
pub mod dates;
pub mod models;
pub mod utils;
pub mod cli;
pub mod tui;

pub use config::Config;
pub use database::Database;
pub use models::{Contact, GiftPlan, GiftStatus, UserProfile};
pub use utils::Profile;
