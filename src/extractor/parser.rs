//! Naive article derivation from fetched markup.

use dom_query::Document;
use tracing::debug;
use url::Url;

use super::types::ExtractionResult;
use crate::error::ExtractError;

/// Title used when the document has no usable `<title>`.
pub const NO_TITLE: &str = "No title";

/// Parse a URL string, keeping the caller's input in the error.
pub fn parse_url(url: &str) -> Result<Url, ExtractError> {
    Url::parse(url).map_err(|source| ExtractError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Build an article from a page's HTML.
///
/// The markup is parsed leniently; broken HTML never fails. Only an
/// unparseable `url` is an error. The returned `url` is the input unchanged.
pub fn parse_article(url: &str, html: &str) -> Result<ExtractionResult, ExtractError> {
    let parsed = parse_url(url)?;
    let doc = Document::from(html);

    let title = extract_title(&doc);
    let content = extract_paragraphs(&doc);
    let domain = domain_of(&parsed);

    debug!(
        title = %title,
        domain = %domain,
        content_len = content.len(),
        "Parsed article"
    );

    Ok(ExtractionResult {
        title,
        domain,
        url: url.to_string(),
        content,
    })
}

/// Host of `url` with a leading "www." removed. Empty when there is no host.
pub fn domain_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// First `<title>` text, trimmed, or [`NO_TITLE`].
fn extract_title(doc: &Document) -> String {
    doc.select("title")
        .nodes()
        .first()
        .map(|node| node.text().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Text of every non-empty `<p>`, trimmed, joined by single spaces.
fn extract_paragraphs(doc: &Document) -> String {
    let paragraphs: Vec<String> = doc
        .select("p")
        .nodes()
        .iter()
        .map(|node| node.text().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    paragraphs.join(" ")
}
