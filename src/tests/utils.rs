// src/tests/utils.rs
use crate::errors::{ExportError, Result};
use crate::listings::{CellValue, Row};
use crate::reverb::{Page, PageSource};
use crate::spreadsheets::RowSink;
use serde_json::Value;
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::collections::HashMap;
use std::path::Path;

/// Serves canned pages keyed by URL and records every request.
#[derive(Default)]
pub struct FakeApi {
    pages: HashMap<String, Page>,
    failures: HashMap<String, u16>,
    pub requested: Vec<String>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `url` from a raw JSON body like the API would send.
    pub fn page(mut self, url: &str, body: Value) -> Self {
        let listings = body
            .get("listings")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let next = body
            .pointer("/_links/next/href")
            .and_then(Value::as_str)
            .map(str::to_string);
        self.pages.insert(url.to_string(), Page { listings, next });
        self
    }

    pub fn failing(mut self, url: &str, status: u16) -> Self {
        self.failures.insert(url.to_string(), status);
        self
    }
}

impl PageSource for FakeApi {
    fn fetch_page(&mut self, url: &str) -> Result<Page> {
        self.requested.push(url.to_string());

        if let Some(status) = self.failures.get(url) {
            return Err(ExportError::Http {
                status: *status,
                body: r#"{"message":"boom"}"#.to_string(),
            });
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ExportError::Transport(format!("no route to {url}")))
    }
}

impl RowSink for Vec<Row> {
    fn append_row(&mut self, row: &Row) -> Result<()> {
        self.push(row.clone());
        Ok(())
    }
}

pub fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

pub fn empty() -> CellValue {
    CellValue::Text(String::new())
}

/// Read a saved workbook back, one `Vec` per row (header included).
pub fn read_sheet(path: &Path, sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .unwrap_or_else(|e| panic!("failed to open {}: {e}", path.display()));
    let range = workbook
        .worksheet_range(sheet)
        .unwrap_or_else(|e| panic!("missing sheet {sheet}: {e}"));
    range.rows().map(|row| row.to_vec()).collect()
}

/// Minimal HTTP/1.1 server on a loopback port. Answers each connection with
/// the next canned `(status, body)` and hands back the raw requests it saw.
pub struct StubServer {
    pub base_url: String,
    handle: std::thread::JoinHandle<Vec<String>>,
}

impl StubServer {
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = std::thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();

                let mut raw = Vec::new();
                let mut buf = [0u8; 1024];
                while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    raw.extend_from_slice(&buf[..n]);
                }
                requests.push(String::from_utf8_lossy(&raw).into_owned());

                let reply = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/hal+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(reply.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
            requests
        });

        Self { base_url, handle }
    }

    /// Wait for every canned response to be served; returns the requests.
    pub fn finish(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}
