//! HBase adapter using the REST gateway (Stargate).
//!
//! The gateway is typically available on port 8080. Every request asks for
//! JSON; cell values come back base64-encoded.
//!
//! ## Endpoints Used
//!
//! - `GET /version/cluster`: connectivity check
//! - `GET /`: table listing
//! - `GET /<table>/regions`: table existence and enabled state
//! - `GET /<table>/<row>/<family:qualifier>?v=1`: latest cell version
//!
//! ## Example
//!
//! ```rust,no_run
//! use cellprobe_adapters::hbase::HBaseRestStore;
//! use cellprobe_adapters::{CellQuery, CellStore, Endpoint};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = HBaseRestStore::new();
//!     let mut session = store.connect(&Endpoint::new("localhost", 8080)).await?;
//!
//!     let cells = session.cells(&CellQuery::new("metrics", "host1", "d:load")).await?;
//!     println!("{:?}", cells);
//!
//!     session.close();
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{CellQuery, CellSession, CellStore, Endpoint, StoreError};

const JSON: &str = "application/json";

/// [`CellStore`] talking to an HBase REST gateway.
#[derive(Debug, Clone, Default)]
pub struct HBaseRestStore {
    user_agent: Option<String>,
}

impl HBaseRestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the `User-Agent` header sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[async_trait]
impl CellStore for HBaseRestStore {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn CellSession>, StoreError> {
        let mut builder = Client::builder()
            .timeout(endpoint.timeout)
            .connect_timeout(endpoint.timeout);
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        let mut session = HBaseRestSession {
            client: Some(client),
            base_url: endpoint.base_url(),
            description: format!("HBase REST gateway at {}", endpoint),
        };
        let version = session.fetch_version().await?;
        session.description = format!("{} (HBase {})", session.description, version);

        Ok(Box::new(session))
    }
}

#[derive(Debug)]
struct HBaseRestSession {
    // None once closed.
    client: Option<Client>,
    base_url: String,
    description: String,
}

impl HBaseRestSession {
    fn get(&self, path: &str) -> Result<reqwest::RequestBuilder, StoreError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| StoreError::Connection("session already closed".to_string()))?;
        Ok(client
            .get(format!("{}{}", self.base_url, path))
            .header(ACCEPT, JSON))
    }

    async fn fetch_version(&self) -> Result<String, StoreError> {
        let response = self.get("/version/cluster")?.send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }
        let body = response.text().await?;
        Ok(body.trim().trim_matches('"').to_string())
    }
}

#[async_trait]
impl CellSession for HBaseRestSession {
    async fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        let response = self.get("/")?.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(unexpected_status(status, &body));
        }
        parse_table_list(&body)
    }

    async fn is_table_enabled(&self, table: &str) -> Result<bool, StoreError> {
        let path = format!("/{}/regions", encode_segment(table));
        let response = self.get(&path)?.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        if status.is_success() {
            return Ok(true);
        }

        let body = response.text().await?;
        if is_disabled_error(&body) {
            return Ok(false);
        }
        Err(classify_error(status, &body, table, ""))
    }

    async fn cells(&self, query: &CellQuery) -> Result<Vec<String>, StoreError> {
        let path = format!(
            "/{}/{}/{}?v=1",
            encode_segment(&query.table),
            encode_segment(&query.row),
            encode_segment(&query.column)
        );
        let response = self.get(&path)?.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(classify_error(status, &body, &query.table, query.family()));
        }
        parse_cell_set(&body)
    }

    fn close(&mut self) {
        self.client = None;
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Table listing returned by `GET /`.
#[derive(Debug, Deserialize)]
struct TableList {
    #[serde(default)]
    table: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    name: String,
}

/// Cell set returned by a row query.
#[derive(Debug, Deserialize)]
struct CellSet {
    #[serde(rename = "Row", default)]
    rows: Vec<RowModel>,
}

#[derive(Debug, Deserialize)]
struct RowModel {
    #[serde(rename = "Cell", default)]
    cells: Vec<CellModel>,
}

#[derive(Debug, Deserialize)]
struct CellModel {
    #[serde(rename = "$")]
    value: String,
}

fn parse_table_list(body: &str) -> Result<Vec<String>, StoreError> {
    let list: TableList =
        serde_json::from_str(body).map_err(|e| StoreError::Malformed(e.to_string()))?;
    Ok(list.table.into_iter().map(|t| t.name).collect())
}

fn parse_cell_set(body: &str) -> Result<Vec<String>, StoreError> {
    let set: CellSet =
        serde_json::from_str(body).map_err(|e| StoreError::Malformed(e.to_string()))?;

    set.rows
        .into_iter()
        .flat_map(|row| row.cells)
        .map(|cell| {
            let bytes = STANDARD
                .decode(cell.value.as_bytes())
                .map_err(|e| StoreError::Malformed(format!("cell value is not base64: {}", e)))?;
            String::from_utf8(bytes)
                .map_err(|e| StoreError::Malformed(format!("cell value is not UTF-8: {}", e)))
        })
        .collect()
}

fn is_disabled_error(body: &str) -> bool {
    body.contains("TableNotEnabledException") || body.contains("is disabled")
}

// The gateway reports server-side exceptions in the plain text body.
fn classify_error(status: StatusCode, body: &str, table: &str, family: &str) -> StoreError {
    if body.contains("TableNotFoundException") {
        StoreError::TableNotFound(table.to_string())
    } else if body.contains("NoSuchColumnFamilyException") {
        StoreError::ColumnFamilyNotFound(family.to_string())
    } else {
        unexpected_status(status, body)
    }
}

fn unexpected_status(status: StatusCode, body: &str) -> StoreError {
    match body.lines().map(str::trim).find(|l| !l.is_empty()) {
        Some(line) => StoreError::Http(format!("API returned status {}: {}", status, line)),
        None => StoreError::Http(format!("API returned status {}", status)),
    }
}

// Percent-encode a path segment, keeping ':' for namespaces and columns.
fn encode_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b':' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
