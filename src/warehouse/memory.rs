//! In-memory warehouse implementation.
//!
//! Useful for testing and local development.

use super::{FitnessRecord, Warehouse};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory warehouse.
pub struct MemoryWarehouse {
    records: RwLock<Vec<FitnessRecord>>,
}

impl MemoryWarehouse {
    /// Create a new empty warehouse.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a warehouse pre-seeded with records.
    pub fn with_records(records: Vec<FitnessRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl Default for MemoryWarehouse {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Warehouse for MemoryWarehouse {
    async fn latest_record(&self, email: &str) -> Result<Option<FitnessRecord>> {
        let records = self.records.read().unwrap();
        let mut matching: Vec<&FitnessRecord> =
            records.iter().filter(|r| r.email == email).collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(matching.first().map(|r| (*r).clone()))
    }

    async fn list_users(&self) -> Result<Vec<String>> {
        let records = self.records.read().unwrap();
        let mut emails: Vec<String> = records.iter().map(|r| r.email.clone()).collect();
        emails.sort();
        emails.dedup();
        Ok(emails)
    }

    async fn register_user(&self, record: &FitnessRecord) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(email: &str, date: NaiveDate, weight: f64) -> FitnessRecord {
        FitnessRecord {
            email: email.to_string(),
            name: "Kari".to_string(),
            age: 34,
            weight,
            target_weight: 65.0,
            height: 170.0,
            goal: "lose weight".to_string(),
            dietary_restrictions: "none".to_string(),
            activity_level: "moderate".to_string(),
            exercise_frequency: 3,
            bmi: 24.2,
            date,
        }
    }

    #[test]
    fn test_latest_record_orders_by_date_desc() {
        let store = MemoryWarehouse::with_records(vec![
            record(
                "kari@example.com",
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                72.0,
            ),
            record(
                "kari@example.com",
                NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                70.0,
            ),
            record(
                "ola@example.com",
                NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                80.0,
            ),
        ]);

        tokio_test::block_on(async {
            let latest = store.latest_record("kari@example.com").await.unwrap().unwrap();
            assert_eq!(latest.weight, 70.0);

            let missing = store.latest_record("nobody@example.com").await.unwrap();
            assert!(missing.is_none());
        });
    }

    #[test]
    fn test_list_users_dedups() {
        let store = MemoryWarehouse::with_records(vec![
            record(
                "kari@example.com",
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                72.0,
            ),
            record(
                "kari@example.com",
                NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                70.0,
            ),
        ]);

        tokio_test::block_on(async {
            let users = store.list_users().await.unwrap();
            assert_eq!(users, vec!["kari@example.com".to_string()]);
        });
    }
}
