//! BigQuery implementation over the REST query API.
//!
//! Queries use NAMED parameters rather than spliced predicates.

use super::{FitnessRecord, Warehouse};
use crate::error::{Result, TrenaError};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Environment variable holding the OAuth bearer token for warehouse calls.
const TOKEN_ENV: &str = "BIGQUERY_ACCESS_TOKEN";

const RECORD_COLUMNS: &str = "email, name, age, weight, target_weight, height, goal, \
     dietary_restrictions, activity_level, exercise_frequency, BMI, date";

/// Warehouse backed by a BigQuery dataset.
pub struct BigQueryWarehouse {
    client: reqwest::Client,
    api_base: String,
    project: String,
    dataset: String,
    table: String,
}

impl BigQueryWarehouse {
    /// Create a warehouse for the given project, dataset, and table.
    pub fn new(project: &str, dataset: &str, table: &str) -> Self {
        Self::with_api_base(
            project,
            dataset,
            table,
            "https://bigquery.googleapis.com/bigquery/v2",
        )
    }

    /// Create a warehouse against a custom API base (for emulators).
    pub fn with_api_base(project: &str, dataset: &str, table: &str, api_base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            project: project.to_string(),
            dataset: dataset.to_string(),
            table: table.to_string(),
        }
    }

    fn bearer_token() -> Result<String> {
        std::env::var(TOKEN_ENV)
            .map_err(|_| TrenaError::Warehouse(format!("{} is not set", TOKEN_ENV)))
    }

    fn table_path(&self) -> String {
        format!("`{}.{}.{}`", self.project, self.dataset, self.table)
    }

    /// Run a query and return rows as column-name -> cell maps.
    async fn run_query(
        &self,
        query: &str,
        parameters: Vec<Value>,
    ) -> Result<Vec<HashMap<String, Option<String>>>> {
        let token = Self::bearer_token()?;
        let url = format!("{}/projects/{}/queries", self.api_base, self.project);

        let mut body = json!({
            "query": query,
            "useLegacySql": false,
        });
        if !parameters.is_empty() {
            body["parameterMode"] = json!("NAMED");
            body["queryParameters"] = Value::Array(parameters);
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TrenaError::Warehouse(format!(
                "Query failed with {}: {}",
                status, text
            )));
        }

        let payload: Value = response.json().await?;
        Ok(parse_rows(&payload))
    }
}

/// Named STRING query parameter.
fn string_param(name: &str, value: &str) -> Value {
    json!({
        "name": name,
        "parameterType": { "type": "STRING" },
        "parameterValue": { "value": value },
    })
}

/// Zip the response schema with each row's cells.
fn parse_rows(payload: &Value) -> Vec<HashMap<String, Option<String>>> {
    let fields: Vec<String> = payload["schema"]["fields"]
        .as_array()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let rows = match payload["rows"].as_array() {
        Some(rows) => rows,
        None => return Vec::new(),
    };

    rows.iter()
        .map(|row| {
            let cells = row["f"].as_array().cloned().unwrap_or_default();
            fields
                .iter()
                .zip(cells.iter())
                .map(|(name, cell)| (name.clone(), cell["v"].as_str().map(str::to_string)))
                .collect()
        })
        .collect()
}

fn cell_str(row: &HashMap<String, Option<String>>, column: &str) -> String {
    row.get(column).and_then(|v| v.clone()).unwrap_or_default()
}

fn cell_f64(row: &HashMap<String, Option<String>>, column: &str) -> f64 {
    cell_str(row, column).parse().unwrap_or(0.0)
}

fn cell_u32(row: &HashMap<String, Option<String>>, column: &str) -> u32 {
    cell_str(row, column).parse().unwrap_or(0)
}

fn record_from_row(row: &HashMap<String, Option<String>>) -> FitnessRecord {
    FitnessRecord {
        email: cell_str(row, "email"),
        name: cell_str(row, "name"),
        age: cell_u32(row, "age"),
        weight: cell_f64(row, "weight"),
        target_weight: cell_f64(row, "target_weight"),
        height: cell_f64(row, "height"),
        goal: cell_str(row, "goal"),
        dietary_restrictions: cell_str(row, "dietary_restrictions"),
        activity_level: cell_str(row, "activity_level"),
        exercise_frequency: cell_u32(row, "exercise_frequency"),
        bmi: cell_f64(row, "BMI"),
        date: cell_str(row, "date")
            .parse()
            .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
    }
}

#[async_trait]
impl Warehouse for BigQueryWarehouse {
    #[instrument(skip(self))]
    async fn latest_record(&self, email: &str) -> Result<Option<FitnessRecord>> {
        let query = format!(
            "SELECT {} FROM {} WHERE email = @email ORDER BY date DESC LIMIT 1",
            RECORD_COLUMNS,
            self.table_path()
        );

        let rows = self
            .run_query(&query, vec![string_param("email", email)])
            .await?;

        debug!("Latest-record query returned {} row(s)", rows.len());
        Ok(rows.first().map(record_from_row))
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<String>> {
        let query = format!(
            "SELECT DISTINCT email FROM {} ORDER BY email",
            self.table_path()
        );
        let rows = self.run_query(&query, Vec::new()).await?;
        Ok(rows.iter().map(|row| cell_str(row, "email")).collect())
    }

    #[instrument(skip(self, record), fields(email = %record.email))]
    async fn register_user(&self, record: &FitnessRecord) -> Result<()> {
        let token = Self::bearer_token()?;
        let url = format!(
            "{}/projects/{}/datasets/{}/tables/{}/insertAll",
            self.api_base, self.project, self.dataset, self.table
        );

        let body = json!({
            "rows": [{
                "json": {
                    "email": record.email,
                    "name": record.name,
                    "age": record.age,
                    "weight": record.weight,
                    "target_weight": record.target_weight,
                    "height": record.height,
                    "goal": record.goal,
                    "dietary_restrictions": record.dietary_restrictions,
                    "activity_level": record.activity_level,
                    "exercise_frequency": record.exercise_frequency,
                    "BMI": record.bmi,
                    "date": record.date.to_string(),
                }
            }]
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TrenaError::Warehouse(format!(
                "Insert failed with {}: {}",
                status, text
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_zips_schema_and_cells() {
        let payload = json!({
            "schema": { "fields": [{ "name": "email" }, { "name": "age" }] },
            "rows": [
                { "f": [{ "v": "kari@example.com" }, { "v": "34" }] },
                { "f": [{ "v": "ola@example.com" }, { "v": null }] },
            ]
        });

        let rows = parse_rows(&payload);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("email").unwrap().as_deref(),
            Some("kari@example.com")
        );
        assert_eq!(rows[0].get("age").unwrap().as_deref(), Some("34"));
        assert_eq!(rows[1].get("age").unwrap().as_deref(), None);
    }

    #[test]
    fn test_parse_rows_empty_result() {
        let payload = json!({ "schema": { "fields": [{ "name": "email" }] } });
        assert!(parse_rows(&payload).is_empty());
    }

    #[test]
    fn test_record_from_row_defaults_bad_cells() {
        let mut row = HashMap::new();
        row.insert("email".to_string(), Some("kari@example.com".to_string()));
        row.insert("age".to_string(), Some("not-a-number".to_string()));

        let record = record_from_row(&row);
        assert_eq!(record.email, "kari@example.com");
        assert_eq!(record.age, 0);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    }
}
