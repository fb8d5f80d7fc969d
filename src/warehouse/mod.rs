//! Tabular warehouse abstraction for user fitness data.
//!
//! Provides a trait-based interface over the backend that holds registered
//! users and their most recent fitness records.

mod bigquery;
mod memory;

pub use bigquery::BigQueryWarehouse;
pub use memory::MemoryWarehouse;

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One user's fitness record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessRecord {
    pub email: String,
    pub name: String,
    pub age: u32,
    /// Current weight in kilograms.
    pub weight: f64,
    /// Target weight in kilograms.
    pub target_weight: f64,
    /// Height in centimeters.
    pub height: f64,
    pub goal: String,
    pub dietary_restrictions: String,
    pub activity_level: String,
    /// Workouts per week.
    pub exercise_frequency: u32,
    pub bmi: f64,
    /// Date the record was captured.
    pub date: NaiveDate,
}

/// Trait for warehouse implementations.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Fetch the most recent record for a user by email. None when the user
    /// has no records (a normal outcome, not an error).
    async fn latest_record(&self, email: &str) -> Result<Option<FitnessRecord>>;

    /// List the distinct registered user emails.
    async fn list_users(&self) -> Result<Vec<String>>;

    /// Register a new user record.
    async fn register_user(&self, record: &FitnessRecord) -> Result<()>;
}

/// Check that an email has a plausible shape before querying with it.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
    });
    re.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("kari@example.com"));
        assert!(is_valid_email("ola.nordmann@trening.no"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }
}
