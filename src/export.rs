// src/export.rs
use crate::auth::CredentialProvider;
use crate::config::ExportConfig;
use crate::errors::{ExportError, Result};
use crate::listings::map_listing;
use crate::reverb::{PageSource, ReverbClient};
use crate::spreadsheets::{RowSink, SheetWriter};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: usize,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub pages: usize,
    pub rows: usize,
}

/// Follow `next` links from `start_url` until a page has none, mapping every
/// listing into `sink` in the order received.
///
/// `delay` is slept between consecutive requests, never after the last one.
/// Any error aborts the walk immediately.
pub fn paginate<S, K>(
    source: &mut S,
    sink: &mut K,
    start_url: &str,
    delay: Duration,
) -> Result<ExportSummary>
where
    S: PageSource + ?Sized,
    K: RowSink + ?Sized,
{
    paginate_with(source, sink, start_url, delay, std::thread::sleep)
}

/// [`paginate`] with the pause between pages supplied by the caller.
pub fn paginate_with<S, K, P>(
    source: &mut S,
    sink: &mut K,
    start_url: &str,
    delay: Duration,
    mut pause: P,
) -> Result<ExportSummary>
where
    S: PageSource + ?Sized,
    K: RowSink + ?Sized,
    P: FnMut(Duration),
{
    let mut summary = ExportSummary { pages: 0, rows: 0 };
    let mut seen = HashSet::new();
    let mut url = start_url.to_string();

    loop {
        seen.insert(url.clone());

        let page = source.fetch_page(&url)?;
        summary.pages += 1;

        info!(
            page = summary.pages,
            listings = page.listings.len(),
            url = %url,
            "fetched listings page"
        );

        for listing in &page.listings {
            sink.append_row(&map_listing(listing))?;
            summary.rows += 1;
        }

        let Some(next) = page.next else {
            break;
        };

        if seen.contains(&next) {
            warn!(url = %next, "next link points back to an already fetched page");
            return Err(ExportError::PaginationCycle(next));
        }

        if !delay.is_zero() {
            pause(delay);
        }
        url = next;
    }

    Ok(summary)
}

/// Full run: resolve the token, walk every page, write the workbook.
///
/// The workbook is only written once all pages succeeded.
pub fn run(config: &ExportConfig, credential: &dyn CredentialProvider) -> Result<ExportOutcome> {
    info!(source = %credential.describe(), "resolving API token");
    let token = credential.token()?;

    let mut client = ReverbClient::new(&token, config.timeout)?;
    let mut writer = SheetWriter::new(&config.sheet_title)?;

    let summary = paginate(
        &mut client,
        &mut writer,
        config.start_url.as_str(),
        config.page_delay,
    )?;

    let rows = writer.finalize(&config.output_path)?;
    info!(
        path = %config.output_path.display(),
        rows,
        pages = summary.pages,
        "workbook saved"
    );

    Ok(ExportOutcome {
        path: config.output_path.clone(),
        pages: summary.pages,
        rows,
    })
}
