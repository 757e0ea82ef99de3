//! Fetching of per-category CSV files.

use gloo_net::http::Request;

use crate::model::{ParsedRows, parse_csv};

/// Category loaded when the dashboard first mounts.
pub const DEFAULT_CATEGORY: &str = "income";

/// Relative location of one category's CSV file.
pub fn dataset_url(category: &str) -> String {
    format!("./{category}_data.csv")
}

/// Fetch and parse one category dataset. Errors carry a user-facing
/// message; the caller decides what stays on screen.
pub async fn fetch_dataset(category: &str) -> Result<ParsedRows, String> {
    let url = dataset_url(category);
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("request for {url} failed: {e}"))?;
    if !response.ok() {
        return Err(format!("request for {url} failed: HTTP {}", response.status()));
    }
    let text = response
        .text()
        .await
        .map_err(|e| format!("could not read {url}: {e}"))?;
    parse_csv(&text)
}
