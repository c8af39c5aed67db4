use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::paper::Paper;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus file '{path}' is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// `speculative decoding` -> `<data_dir>/speculative_decoding_papers.json`.
pub fn corpus_path(data_dir: &Path, keyword: &str) -> PathBuf {
    data_dir.join(format!("{}_papers.json", file_stem(keyword)))
}

/// Same stem as the corpus, Markdown suffix.
pub fn report_path(data_dir: &Path, keyword: &str) -> PathBuf {
    data_dir.join(format!("{}_papers.md", file_stem(keyword)))
}

fn file_stem(keyword: &str) -> String {
    keyword.replace(' ', "_")
}

/// Read the corpus for one keyword. A missing file means an empty corpus;
/// a present but unparsable file is a hard error, kept distinct from I/O
/// failures so a truncated corpus is never silently treated as empty.
pub fn load_corpus(path: &Path) -> Result<Vec<Paper>, StoreError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no corpus file yet, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&text).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrite the corpus file with the full paper set. Creates the parent
/// directory on first save. The write is not atomic; the process has no
/// concurrent writers by design.
pub fn save_corpus(path: &Path, papers: &[Paper]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(papers).map_err(std::io::Error::from)?;
    std::fs::write(path, json)?;
    debug!(path = %path.display(), count = papers.len(), "corpus saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str, published: &str) -> Paper {
        Paper {
            title: title.to_string(),
            summary: "An abstract.".to_string(),
            authors: "Jane Doe".to_string(),
            published: published.to_string(),
            link: format!("https://arxiv.org/abs/{title}"),
            chinese_summary: None,
            tldr_en: None,
            tldr_zh: None,
        }
    }

    #[test]
    fn paths_replace_spaces_with_underscores() {
        let dir = Path::new("data");
        assert_eq!(
            corpus_path(dir, "speculative decoding"),
            Path::new("data/speculative_decoding_papers.json")
        );
        assert_eq!(
            report_path(dir, "speculative decoding"),
            Path::new("data/speculative_decoding_papers.md")
        );
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let papers = load_corpus(&dir.path().join("absent_papers.json")).unwrap();
        assert!(papers.is_empty());
    }

    #[test]
    fn load_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_papers.json");
        std::fs::write(&path, "[{not json").unwrap();

        let err = load_corpus(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kw_papers.json");

        let mut enriched = paper("2401.00001", "2024-01-01");
        enriched.chinese_summary = Some("翻译".into());
        enriched.tldr_en = Some("en".into());
        enriched.tldr_zh = Some("zh".into());
        let papers = vec![paper("2402.00002", "2024-02-02"), enriched];

        save_corpus(&path, &papers).unwrap();
        let loaded = load_corpus(&path).unwrap();
        assert_eq!(loaded, papers);
    }

    #[test]
    fn save_creates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/kw_papers.json");
        save_corpus(&path, &[paper("2401.00001", "2024-01-01")]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kw_papers.json");

        save_corpus(&path, &[paper("a", "2024-01-01"), paper("b", "2024-01-02")]).unwrap();
        save_corpus(&path, &[paper("c", "2024-01-03")]).unwrap();

        let loaded = load_corpus(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "c");
    }
}
