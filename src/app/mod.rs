//! The download flow behind the `pinoader` binary.
//!
//! Resolve the pin page (short links redirect to it), strip tracking
//! segments from its URL, scrape the media URLs out of the HTML and save
//! them over HTTPS.

pub mod statistics;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::{debug, error, info};

use crate::client::HttpClient;
use crate::config::Opt;
use crate::media::{
    find_thumbnail_url, find_video_url, sanitize_pin_url, thumbnail_filename, video_filename,
};

pub use statistics::{log_error_statistics, log_pool_statistics};

/// What a run saved.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadReport {
    /// Sanitized pin page URL the media was scraped from
    pub page_url: String,
    pub video: PathBuf,
    /// Set only if a thumbnail was requested and saved
    pub thumbnail: Option<PathBuf>,
    pub elapsed_seconds: f64,
}

/// Runs the whole flow for the command-line options.
///
/// # Errors
///
/// Fails if the client cannot be initialized, the page cannot be fetched,
/// no video URL is found on it, or the video download fails. A failed
/// thumbnail download is logged and does not fail the run.
pub fn run(opt: &Opt) -> Result<DownloadReport> {
    let start = Instant::now();
    debug!("[main] Target URL: {}", opt.url);

    let mut client =
        HttpClient::new(opt.client_config()).context("Failed to initialize HTTP client")?;
    let result = download_pin(&mut client, &opt.url, opt.output.as_deref(), opt.thumbnail);

    log_error_statistics(client.stats());
    log_pool_statistics(client.pool());
    let elapsed_seconds = start.elapsed().as_secs_f64();
    debug!("[main] Total execution time: {elapsed_seconds:.3} seconds.");

    result.map(|report| DownloadReport {
        elapsed_seconds,
        ..report
    })
}

/// Fetches the pin page at `url` and saves its video, plus its thumbnail if
/// `with_thumbnail` is set.
pub fn download_pin(
    client: &mut HttpClient,
    url: &str,
    output: Option<&Path>,
    with_thumbnail: bool,
) -> Result<DownloadReport> {
    let start = Instant::now();
    info!("[pinterest] {url}: Resolving URL");
    let (html, page_url) = fetch_pin_page(client, url)?;
    debug!("[pinterest] Final URL: {page_url}");
    debug!(
        "[parser] Received {} bytes of HTML. Parsing for media URL.",
        html.len()
    );

    let thumbnail = if with_thumbnail {
        save_thumbnail(client, &html, output, &page_url)
    } else {
        None
    };

    let Some(media_url) = find_video_url(&html) else {
        bail!("Could not find media URL on the page.");
    };
    info!("[downloader] Media URL: {media_url}");

    let video = video_filename(output, &page_url);
    if !client.download(media_url, &video) {
        bail!("Failed to download the file.");
    }
    info!("[pinoader] File saved: {}", video.display());

    Ok(DownloadReport {
        page_url,
        video,
        thumbnail,
        elapsed_seconds: start.elapsed().as_secs_f64(),
    })
}

/// Fetches the page and, if its final URL carries extra segments, fetches
/// the sanitized URL instead. Returns the HTML and the sanitized URL.
fn fetch_pin_page(client: &mut HttpClient, url: &str) -> Result<(String, String)> {
    let page = client.fetch_page(url);
    let final_url = page.as_ref().map_or(url, |p| p.final_url.as_str());
    let clean_url = sanitize_pin_url(final_url).to_string();

    let body = if clean_url != final_url {
        debug!("[pinterest] URL contains extra parameters. Sanitizing to: {clean_url}");
        client.fetch_page(&clean_url).map(|p| p.body)
    } else {
        page.map(|p| p.body)
    }
    .unwrap_or_default();

    if body.is_empty() {
        bail!("Failed to fetch HTML content from the final URL.");
    }
    Ok((String::from_utf8_lossy(&body).into_owned(), clean_url))
}

fn save_thumbnail(
    client: &mut HttpClient,
    html: &str,
    output: Option<&Path>,
    page_url: &str,
) -> Option<PathBuf> {
    let Some(thumbnail_url) = find_thumbnail_url(html) else {
        error!("Could not find thumbnail URL on the page.");
        return None;
    };
    info!("[downloader] Thumbnail URL: {thumbnail_url}");

    let path = thumbnail_filename(output, page_url);
    if client.download(thumbnail_url, &path) {
        info!("[pinoader] Thumbnail saved: {}", path.display());
        Some(path)
    } else {
        error!("Failed to download the thumbnail.");
        None
    }
}
