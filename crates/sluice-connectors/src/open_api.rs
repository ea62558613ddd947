//! Public-API catalogue source: fetch the entry list and normalize it into
//! the fixed intermediate column set.

use chrono::NaiveDate;
use serde::Deserialize;
use sluice_types::ExecutionError;

const OPEN_API_URL: &str = "https://api.publicapis.org/entries";

/// Header row of the intermediate file. Column order is load-bearing: the
/// bulk-load target relation is defined in this order.
pub const COLUMNS: [&str; 8] = [
    "API",
    "Description",
    "Auth",
    "HTTPS",
    "Cors",
    "Link",
    "Category",
    "work_date",
];

#[derive(Debug, Deserialize)]
struct EntriesResponse {
    entries: Vec<ApiEntry>,
}

/// One catalogue entry as served by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEntry {
    #[serde(rename = "API")]
    pub api: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Auth")]
    pub auth: String,
    #[serde(rename = "HTTPS")]
    pub https: bool,
    #[serde(rename = "Cors")]
    pub cors: String,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Category")]
    pub category: String,
}

impl ApiEntry {
    /// One intermediate-file row, with the run work date appended.
    pub fn to_record(&self, work_date: NaiveDate) -> Vec<String> {
        vec![
            self.api.clone(),
            self.description.clone(),
            self.auth.clone(),
            self.https.to_string(),
            self.cors.clone(),
            self.link.clone(),
            self.category.clone(),
            work_date.to_string(),
        ]
    }
}

/// Fetch and decode the full entry list.
///
/// # Errors
///
/// Returns [`ExecutionError::Fetch`] on request, status, or decode failure.
pub async fn fetch_entries(client: &reqwest::Client) -> Result<Vec<ApiEntry>, ExecutionError> {
    let response = client
        .get(OPEN_API_URL)
        .send()
        .await
        .map_err(|e| ExecutionError::Fetch(format!("GET {OPEN_API_URL}: {e}")))?
        .error_for_status()
        .map_err(|e| ExecutionError::Fetch(format!("GET {OPEN_API_URL}: {e}")))?;

    let body: EntriesResponse = response
        .json()
        .await
        .map_err(|e| ExecutionError::Fetch(format!("decoding {OPEN_API_URL}: {e}")))?;

    Ok(body.entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_payload() {
        let payload = r#"{
            "count": 1,
            "entries": [{
                "API": "Cat Facts",
                "Description": "Daily cat facts",
                "Auth": "",
                "HTTPS": true,
                "Cors": "no",
                "Link": "https://catfact.ninja/",
                "Category": "Animals"
            }]
        }"#;
        let body: EntriesResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(body.entries.len(), 1);
        assert_eq!(body.entries[0].api, "Cat Facts");
        assert!(body.entries[0].https);
    }

    #[test]
    fn record_matches_column_set() {
        let entry = ApiEntry {
            api: "Cat Facts".to_string(),
            description: "Daily cat facts".to_string(),
            auth: String::new(),
            https: true,
            cors: "no".to_string(),
            link: "https://catfact.ninja/".to_string(),
            category: "Animals".to_string(),
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let record = entry.to_record(date);
        assert_eq!(record.len(), COLUMNS.len());
        assert_eq!(record[3], "true");
        assert_eq!(record[7], "2024-03-01");
    }
}
