use std::collections::HashSet;

use tracing::{debug, info};

use crate::arxiv::{ArxivError, PaperFetcher};
use crate::config::Config;
use crate::deepseek::client::{ChatClient, DeepSeekError};
use crate::enrich;
use crate::paper::Paper;
use crate::report;
use crate::store::{self, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    Fetch(#[from] ArxivError),

    #[error("{0}")]
    Enrich(#[from] DeepSeekError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

/// Run the full tracking sequence for one keyword and return how many
/// papers were newly added to its corpus.
///
/// Load, fetch, dedupe, merge, enrich, save, report, strictly in that
/// order, one network call at a time. The corpus is only written after the
/// whole enrichment loop succeeds, so a failed run never persists a
/// half-enriched file; that run's completed enrichments are recomputed on
/// the next invocation.
pub async fn run_keyword(
    fetcher: &impl PaperFetcher,
    chat: &impl ChatClient,
    config: &Config,
    keyword: &str,
) -> Result<usize, PipelineError> {
    let corpus_path = store::corpus_path(&config.data_dir, keyword);
    let report_path = store::report_path(&config.data_dir, keyword);

    let existing = store::load_corpus(&corpus_path)?;
    let fetched = fetcher.fetch(keyword, config.fetch_num).await?;
    info!(keyword, count = fetched.len(), "fetched papers");

    if fetched.is_empty() {
        info!(keyword, "no new papers found");
        return Ok(0);
    }

    let fresh: Vec<Paper> = {
        let seen: HashSet<&str> = existing
            .iter()
            .map(|p| p.identity(config.dedup_key))
            .collect();
        fetched
            .into_iter()
            .filter(|p| !seen.contains(p.identity(config.dedup_key)))
            .collect()
    };

    if fresh.is_empty() {
        info!(keyword, "no new papers found");
        return Ok(0);
    }

    let added = fresh.len();
    let mut corpus = existing;
    corpus.extend(fresh);
    corpus.sort_by(|a, b| b.published.cmp(&a.published));

    // Also picks up papers a previously interrupted run left unenriched.
    for paper in corpus.iter_mut().filter(|p| !p.is_enriched()) {
        debug!(keyword, title = %paper.title, "enriching");
        enrich::enrich(chat, &paper.summary).await?.apply(paper);
    }

    store::save_corpus(&corpus_path, &corpus)?;
    report::write_report(&report_path, &corpus)?;
    info!(
        keyword,
        added,
        report = %report_path.display(),
        "new papers saved"
    );
    Ok(added)
}
