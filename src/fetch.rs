//! Download of the election portal page, with a local-snapshot fallback
//! owned by the caller. The rest of the pipeline never cares where a
//! document came from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use colored::*;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};

/// The portal serves a stripped block page to clients it does not like;
/// a real results page is far larger than this.
const MIN_DOCUMENT_LEN: usize = 10_000;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Attempt to download the portal page. Returns None on any failure so
/// the caller can fall back to a saved snapshot.
pub fn fetch_document(url: &str, timeout: Duration) -> Option<String> {
    let client = match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("⚠️  Could not build HTTP client: {}", e);
            return None;
        }
    };
    let response = client
        .get(url)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .send();
    match response {
        Ok(resp) if resp.status().is_success() => match resp.text() {
            Ok(body) if body.len() > MIN_DOCUMENT_LEN => Some(body),
            Ok(body) => {
                eprintln!(
                    "⚠️  Response from {} too short to be the portal page ({} bytes)",
                    url.yellow(),
                    body.len()
                );
                None
            }
            Err(e) => {
                eprintln!("⚠️  Failed to read response body: {}", e);
                None
            }
        },
        Ok(resp) => {
            eprintln!("⚠️  {} returned status {}", url.yellow(), resp.status());
            None
        }
        Err(e) => {
            eprintln!("⚠️  Download failed: {}", e);
            None
        }
    }
}

/// Where a freshly downloaded page is kept for future offline runs:
/// next to the snapshot, with a `_downloaded` suffix.
pub fn downloaded_copy_path(local_html: &Path) -> PathBuf {
    let stem = local_html
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string());
    local_html.with_file_name(format!("{}_downloaded.html", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downloaded_copy_sits_next_to_the_snapshot() {
        let path = downloaded_copy_path(Path::new("data/tbs_election_2026.html"));
        assert_eq!(path, Path::new("data/tbs_election_2026_downloaded.html"));
    }
}
