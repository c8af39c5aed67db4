use quick_xml::Reader;
use quick_xml::events::Event;

use super::ArxivError;
use crate::paper::Paper;

/// Parse an arXiv Atom feed into unenriched papers, preserving feed order
/// (the API already sorts by submission date when asked to).
///
/// Entries without an id or title are skipped rather than failing the whole
/// feed; only malformed XML is a hard error.
pub fn parse_feed(xml: &str) -> Result<Vec<Paper>, ArxivError> {
    let mut reader = Reader::from_str(xml);
    let mut papers = Vec::new();
    let mut buf = Vec::new();

    let mut in_entry = false;
    let mut in_author = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut summary = String::new();
    let mut link = String::new();
    let mut published = String::new();
    let mut authors: Vec<String> = Vec::new();
    let mut author_name = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag == "entry" {
                    in_entry = true;
                    title.clear();
                    summary.clear();
                    link.clear();
                    published.clear();
                    authors.clear();
                } else if in_entry {
                    if tag == "author" {
                        in_author = true;
                        author_name.clear();
                    }
                    current_tag = tag;
                }
            }
            Ok(Event::Text(e)) if in_entry => {
                let text = e.unescape().unwrap_or_default().to_string();
                match current_tag.as_str() {
                    "title" => title.push_str(&text),
                    "summary" => summary.push_str(&text),
                    "id" if link.is_empty() => link = text,
                    "published" => published.push_str(&text),
                    "name" if in_author => author_name.push_str(&text),
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag == "entry" && in_entry {
                    in_entry = false;
                    if !link.is_empty() && !title.trim().is_empty() {
                        papers.push(Paper {
                            title: normalize(&title),
                            summary: normalize(&summary),
                            authors: authors.join(", "),
                            published: date_part(&published),
                            link: link.trim().to_string(),
                            chinese_summary: None,
                            tldr_en: None,
                            tldr_zh: None,
                        });
                    }
                } else if tag == "author" && in_author {
                    in_author = false;
                    let name = author_name.trim();
                    if !name.is_empty() {
                        authors.push(name.to_string());
                    }
                }
                if tag == current_tag {
                    current_tag.clear();
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ArxivError::Parse(format!("XML parse error: {e}"))),
            _ => {}
        }
        buf.clear();
    }
    Ok(papers)
}

/// Flatten newlines to spaces and trim, matching the corpus format.
fn normalize(text: &str) -> String {
    text.replace(['\n', '\r'], " ").trim().to_string()
}

/// `2024-03-01T17:59:02Z` -> `2024-03-01`.
fn date_part(timestamp: &str) -> String {
    let trimmed = timestamp.trim();
    trimmed.get(..10).unwrap_or(trimmed).to_string()
}
