use tracing::debug;

use crate::deepseek::client::{ChatClient, DeepSeekError};
use crate::paper::Paper;

/// The three derived fields for one paper, produced by three independent
/// single-turn model calls. Call order is fixed: translation, English
/// TL;DR, Chinese TL;DR. A failure on any call aborts without partial
/// results.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub chinese_summary: String,
    pub tldr_en: String,
    pub tldr_zh: String,
}

impl Enrichment {
    pub fn apply(self, paper: &mut Paper) {
        paper.chinese_summary = Some(self.chinese_summary);
        paper.tldr_en = Some(self.tldr_en);
        paper.tldr_zh = Some(self.tldr_zh);
    }
}

pub async fn enrich(chat: &impl ChatClient, summary: &str) -> Result<Enrichment, DeepSeekError> {
    let chinese_summary = chat
        .complete(&format!("请将以下内容翻译成中文：{summary}"))
        .await?;
    let tldr_en = chat
        .complete(&format!("请使用一句话总结以下内容(英文)：{summary}"))
        .await?;
    let tldr_zh = chat
        .complete(&format!("请使用一句话总结以下内容(中文)：{summary}"))
        .await?;
    debug!(chars = summary.len(), "summary enriched");
    Ok(Enrichment {
        chinese_summary,
        tldr_en,
        tldr_zh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct MockChat {
        replies: Mutex<VecDeque<Result<String, DeepSeekError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockChat {
        fn with_replies(replies: Vec<&str>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing_on_second() -> Self {
            Self {
                replies: Mutex::new(VecDeque::from([
                    Ok("翻译".to_string()),
                    Err(DeepSeekError::RateLimited),
                ])),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn captured_prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl ChatClient for MockChat {
        async fn complete(&self, prompt: &str) -> Result<String, DeepSeekError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(DeepSeekError::EmptyReply))
        }
    }

    #[tokio::test]
    async fn maps_replies_to_fields_in_call_order() {
        let mock = MockChat::with_replies(vec!["完整翻译", "One-line summary.", "一句话总结"]);

        let enrichment = enrich(&mock, "An abstract.").await.unwrap();

        assert_eq!(enrichment.chinese_summary, "完整翻译");
        assert_eq!(enrichment.tldr_en, "One-line summary.");
        assert_eq!(enrichment.tldr_zh, "一句话总结");

        let prompts = mock.captured_prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].starts_with("请将以下内容翻译成中文："));
        assert!(prompts[1].starts_with("请使用一句话总结以下内容(英文)："));
        assert!(prompts[2].starts_with("请使用一句话总结以下内容(中文)："));
        assert!(prompts.iter().all(|p| p.ends_with("An abstract.")));
    }

    #[tokio::test]
    async fn failure_aborts_without_partial_result() {
        let mock = MockChat::failing_on_second();

        let err = enrich(&mock, "An abstract.").await.unwrap_err();
        assert!(matches!(err, DeepSeekError::RateLimited));
        // The third call is never made.
        assert_eq!(mock.captured_prompts().len(), 2);
    }

    #[test]
    fn apply_populates_all_three_fields() {
        let mut paper = Paper {
            title: "T".into(),
            summary: "S".into(),
            authors: "A".into(),
            published: "2024-01-01".into(),
            link: "https://arxiv.org/abs/1".into(),
            chinese_summary: None,
            tldr_en: None,
            tldr_zh: None,
        };

        Enrichment {
            chinese_summary: "翻译".into(),
            tldr_en: "en".into(),
            tldr_zh: "zh".into(),
        }
        .apply(&mut paper);

        assert!(paper.is_enriched());
        assert_eq!(paper.chinese_summary.as_deref(), Some("翻译"));
        assert_eq!(paper.tldr_zh.as_deref(), Some("zh"));
    }
}
