use std::path::Path;

use url::Url;

use crate::dom::parser::parse_html;
use crate::dom::DomTree;
use crate::error::{OutlineError, Result};

/// Result of fetching a URL
#[derive(Clone)]
pub struct FetchResult {
    pub html: String,
    pub url: String,
    pub status: u16,
}

/// Fetch a URL and return the HTML content (blocking).
pub fn fetch_url(url_str: &str) -> Result<FetchResult> {
    let parsed = Url::parse(&normalize_url(url_str))?;

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!(
            "Mozilla/5.0 (compatible; ALICE-Outline/0.1; ",
            "+https://github.com/ext-sakamoro/ALICE-Browser)"
        ))
        .timeout(std::time::Duration::from_secs(15))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;

    let response = client
        .get(parsed.as_str())
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .send()?;

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let html = response.text()?;
    log::debug!("Fetched {} ({}, {} bytes)", final_url, status, html.len());

    Ok(FetchResult {
        html,
        url: final_url,
        status,
    })
}

/// Load a document from an http(s) URL or a local HTML file.
pub fn load_document(input: &str) -> Result<DomTree> {
    if is_remote(input) {
        let result = fetch_url(input)?;
        return Ok(parse_html(&result.html, &result.url));
    }

    let path = Path::new(input);
    let html = std::fs::read_to_string(path).map_err(|source| OutlineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let url = path
        .canonicalize()
        .ok()
        .and_then(|abs| Url::from_file_path(abs).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| format!("file://{}", input));
    Ok(parse_html(&html, &url))
}

fn is_remote(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn normalize_url(url_str: &str) -> String {
    if is_remote(url_str) {
        url_str.to_string()
    } else {
        format!("https://{}", url_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hosts_get_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn loads_local_file() {
        let path = std::env::temp_dir().join(format!("alice-outline-{}.html", std::process::id()));
        std::fs::write(&path, "<html><body><h1>Local</h1></body></html>").unwrap();

        let tree = load_document(path.to_str().unwrap()).unwrap();
        assert!(tree.url.starts_with("file://"));
        assert!(tree.root.collect_text().contains("Local"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_document("/nonexistent/page.html").unwrap_err();
        assert!(matches!(err, OutlineError::Io { .. }));
    }
}
