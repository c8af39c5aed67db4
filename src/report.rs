use std::path::Path;

use crate::paper::Paper;

/// Render the digest for one keyword: a summary table, then one detail
/// block per paper. Unenriched papers render their derived fields as empty
/// strings so a partially processed corpus still produces a valid document.
pub fn render_report(papers: &[Paper]) -> String {
    let mut out = String::new();

    out.push_str("| Title | Authors | Published | Link | TL;DR (EN) | TL;DR (ZH) |\n");
    out.push_str("| --- | --- | --- | --- | --- | --- |\n");
    for paper in papers {
        out.push_str(&format!(
            "| [{}]({}) | {} | {} | [Link]({}) | {} | {} |\n",
            escape_link_text(&cell(&paper.title)),
            paper.link,
            cell(&paper.authors),
            paper.published,
            paper.link,
            cell(paper.tldr_en.as_deref().unwrap_or_default()),
            cell(paper.tldr_zh.as_deref().unwrap_or_default()),
        ));
    }

    out.push_str("\n\n");

    for paper in papers {
        out.push_str(&format!("### {}\n", paper.title));
        out.push_str(&format!("- **Authors**: {}\n", paper.authors));
        out.push_str(&format!("- **Published**: {}\n", paper.published));
        out.push_str(&format!("- **Link**: [{}]({})\n", paper.link, paper.link));
        out.push_str(&format!("- **Summary**: {}\n\n", paper.summary));
        out.push_str(&format!(
            "- **中文摘要**: {}\n\n",
            paper.chinese_summary.as_deref().unwrap_or_default()
        ));
    }

    out
}

/// Overwrites any existing report at `path`.
pub fn write_report(path: &Path, papers: &[Paper]) -> Result<(), std::io::Error> {
    std::fs::write(path, render_report(papers))
}

/// Pipes would end the table cell early; newlines would end the row.
fn cell(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '|' => out.push_str("\\|"),
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Escape characters that break Markdown link syntax: `[`, `]`, `(`, `)`.
fn escape_link_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '[' | ']' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
