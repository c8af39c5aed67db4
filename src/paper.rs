use serde::{Deserialize, Serialize};

/// One tracked arXiv paper. The three optional fields are filled in by
/// enrichment and omitted from the corpus file until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    /// Abstract text with newlines flattened to spaces and trimmed.
    pub summary: String,
    /// Comma-joined author names, in feed order.
    pub authors: String,
    /// Submission date, `YYYY-MM-DD`.
    pub published: String,
    /// Canonical arXiv abstract URL (the Atom entry id).
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tldr_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tldr_zh: Option<String>,
}

/// Which field identifies a paper when deduplicating fetched results
/// against the stored corpus.
///
/// `Authors` matches the legacy tracker, which keyed on the joined author
/// string; distinct papers by the same author set collide under it.
/// `Link` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupKey {
    #[default]
    Link,
    Authors,
}

impl Paper {
    /// A paper with `tldr_en` set has been through enrichment and is
    /// never sent to the model again.
    pub fn is_enriched(&self) -> bool {
        self.tldr_en.is_some()
    }

    pub fn identity(&self, key: DedupKey) -> &str {
        match key {
            DedupKey::Link => &self.link,
            DedupKey::Authors => &self.authors,
        }
    }
}
