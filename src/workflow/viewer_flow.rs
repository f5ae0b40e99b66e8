//! 结果页消费流程 - 流程层
//!
//! 结果页上下文拿到的只有自己的 URL。消费顺序：
//! 1. `?key=` 交接存储通道：一次性取走，重复加载观察到 None
//! 2. `?data=` 内联通道：直接解码载荷，幂等（不消费任何东西）
//!
//! 渲染本身不在范围内，这里只负责把载荷拿到手，
//! 外加回跳源文档的页码定位 URL 构造

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tracing::{debug, warn};
use url::form_urlencoded;
use url::Url;

use crate::models::SummaryPayload;
use crate::services::HandoffStore;

/// 回跳 URL 中检索文本的最大长度（字符数）
const FIND_TEXT_LIMIT: usize = 200;

/// 从结果页 URL 加载载荷
///
/// 两个通道都没有可用数据时返回 None
pub fn load_from_url(viewer_url: &str, store: &HandoffStore) -> Option<SummaryPayload> {
    let query = viewer_url.split_once('?').map(|(_, q)| q).unwrap_or("");
    load_from_query(query, store)
}

/// 从查询串加载载荷
pub fn load_from_query(query: &str, store: &HandoffStore) -> Option<SummaryPayload> {
    let mut inline_data: Option<String> = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            // 交接存储优先：一次性消费
            "key" => {
                if let Some(payload) = store.take_once(&value) {
                    debug!("结果页从交接存储取得载荷: {}", value);
                    return Some(payload);
                }
            }
            "data" => inline_data = Some(value.into_owned()),
            _ => {}
        }
    }

    // 内联通道兜底：幂等，不消费
    if let Some(json) = inline_data {
        match serde_json::from_str(&json) {
            Ok(payload) => {
                debug!("结果页从内联参数取得载荷");
                return Some(payload);
            }
            Err(e) => {
                warn!("内联载荷解析失败: {}", e);
            }
        }
    }

    None
}

/// 构造回跳源文档的 URL
///
/// 形如 `<pdf_url>#page=<n>&find=<检索文本>&search=<同上>`，
/// 检索文本截断到 200 字符后百分号编码（空格是 `%20` 而不是 `+`，
/// 片段没有表单语义，查看器按百分号解码）；文本为空时只带页码
pub fn page_jump_url(pdf_url: &str, page: u32, query_text: &str) -> Option<String> {
    let mut url = Url::parse(pdf_url).ok()?;

    if query_text.is_empty() {
        url.set_fragment(Some(&format!("page={}", page)));
    } else {
        let truncated: String = query_text.chars().take(FIND_TEXT_LIMIT).collect();
        let encoded = utf8_percent_encode(&truncated, NON_ALPHANUMERIC).to_string();
        url.set_fragment(Some(&format!(
            "page={}&find={}&search={}",
            page, encoded, encoded
        )));
    }

    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Excerpt, SummaryStats};
    use crate::services::surface_opener::{viewer_url_for_key, viewer_url_for_payload};

    fn payload() -> SummaryPayload {
        SummaryPayload {
            summary: vec![
                Excerpt {
                    text: "first".to_string(),
                    page: 1,
                    score: 0.9,
                },
                Excerpt {
                    text: "second".to_string(),
                    page: 2,
                    score: 0.8,
                },
                Excerpt {
                    text: "third".to_string(),
                    page: 4,
                    score: 0.7,
                },
            ],
            stats: SummaryStats {
                num_sentences: 3,
                num_pages: 4,
                max_words: 500,
            },
            llm: Some("整体叙述".to_string()),
            pdf_url: "https://host/doc.pdf".to_string(),
        }
    }

    #[test]
    fn test_store_channel_consumes_once() {
        let store = HandoffStore::new();
        let key = HandoffStore::make_summary_key();
        store.put(&key, payload());

        let url = viewer_url_for_key(&key);
        let first = load_from_url(&url, &store);
        assert!(first.is_some());

        // 重复打开的结果页看到"不存在"
        assert!(load_from_url(&url, &store).is_none());
    }

    #[test]
    fn test_inline_channel_is_idempotent() {
        let store = HandoffStore::new();
        let url = viewer_url_for_payload(&payload()).unwrap();

        let first = load_from_url(&url, &store).unwrap();
        let second = load_from_url(&url, &store).unwrap();
        assert_eq!(first.pdf_url, second.pdf_url);
        assert_eq!(first.summary.len(), 3);
    }

    #[test]
    fn test_inline_roundtrip_preserves_order_and_fields() {
        let store = HandoffStore::new();
        let url = viewer_url_for_payload(&payload()).unwrap();

        let loaded = load_from_url(&url, &store).unwrap();
        let pages: Vec<u32> = loaded.summary.iter().map(|e| e.page).collect();
        assert_eq!(pages, vec![1, 2, 4]);
        assert!(loaded.summary.iter().all(|e| e.page >= 1));
        assert!(loaded.summary.iter().all(|e| e.score >= 0.0));
        assert_eq!(loaded.llm.as_deref(), Some("整体叙述"));
    }

    #[test]
    fn test_no_channel_yields_none() {
        let store = HandoffStore::new();
        assert!(load_from_url("viewer.html", &store).is_none());
        assert!(load_from_url("viewer.html?theme=dark", &store).is_none());
    }

    #[test]
    fn test_missing_key_falls_through_to_inline() {
        let store = HandoffStore::new();
        let json = serde_json::to_string(&payload()).unwrap();
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("key", "summary_0_gone")
            .append_pair("data", &json)
            .finish();

        let loaded = load_from_query(&query, &store);
        assert!(loaded.is_some());
    }

    #[test]
    fn test_page_jump_url_with_text() {
        let url = page_jump_url("https://host/doc.pdf", 3, "q").unwrap();
        assert_eq!(url, "https://host/doc.pdf#page=3&find=q&search=q");
    }

    #[test]
    fn test_page_jump_url_encodes_space_as_percent20() {
        // 片段按百分号解码，空格必须是 %20；`+` 会被查看器当字面加号，检索落空
        let url = page_jump_url("https://host/doc.pdf", 3, "first sentence").unwrap();
        assert_eq!(
            url,
            "https://host/doc.pdf#page=3&find=first%20sentence&search=first%20sentence"
        );
        assert!(!url.contains('+'));
    }

    #[test]
    fn test_page_jump_url_encodes_reserved_chars() {
        // 文本里的 & 和 = 不能裸露，否则会被误认成片段里的参数分隔符
        let url = page_jump_url("https://host/doc.pdf", 2, "a&b=c").unwrap();
        assert!(url.contains("find=a%26b%3Dc"));
    }

    #[test]
    fn test_page_jump_url_without_text() {
        let url = page_jump_url("https://host/doc.pdf", 7, "").unwrap();
        assert_eq!(url, "https://host/doc.pdf#page=7");
    }

    #[test]
    fn test_page_jump_url_truncates_long_text() {
        let long_text = "很".repeat(500);
        let url = page_jump_url("https://host/doc.pdf", 1, &long_text).unwrap();
        // 200 个字符以内的编码结果，绝不会把 500 个字符全部带上
        let encoded_one = utf8_percent_encode("很", NON_ALPHANUMERIC).to_string();
        assert!(url.matches(&encoded_one).count() <= 2 * FIND_TEXT_LIMIT);
        assert!(url.contains("#page=1&find="));
    }

    #[test]
    fn test_page_jump_url_invalid_base() {
        assert!(page_jump_url("不是 url", 1, "x").is_none());
    }
}
