//! 结果页打开能力 - 业务能力层
//!
//! 流水线成功后要"打开"结果页上下文。上下文之间没有共享内存，
//! 能递过去的只有一个 URL：要么带交接键（`?key=`），
//! 要么直接内联整个载荷（`?data=`，给无后台介入的直连路径用）

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::form_urlencoded;

use crate::error::{SummarizeError, SummarizeResult};
use crate::models::SummaryPayload;

/// 结果页的入口文件名，与 URL 查询一起构成打开契约
pub const VIEWER_PAGE: &str = "viewer.html";

/// 构造带交接键的结果页 URL
pub fn viewer_url_for_key(key: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("key", key)
        .finish();
    format!("{}?{}", VIEWER_PAGE, query)
}

/// 构造内联载荷的结果页 URL
///
/// 载荷整体 JSON 序列化后百分号编码进查询串；
/// 只适合直连路径（没有后台上下文可以代持载荷时）
pub fn viewer_url_for_payload(payload: &SummaryPayload) -> anyhow::Result<String> {
    let json = serde_json::to_string(payload)?;
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("data", &json)
        .finish();
    Ok(format!("{}?{}", VIEWER_PAGE, query))
}

/// 打开结果页的能力
///
/// 真实环境里对应"开一个新标签页"；测试里注入记录型假实现
#[async_trait]
pub trait SurfaceOpener: Send + Sync {
    async fn open(&self, viewer_url: &str) -> SummarizeResult<()>;
}

/// 通过通道把结果页 URL 递给独立运行的结果页上下文
///
/// 结果页任务收到 URL 后自行解析查询并消费交接存储，
/// 和协调器之间除了这条消息通道再无共享
pub struct ChannelSurfaceOpener {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSurfaceOpener {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl SurfaceOpener for ChannelSurfaceOpener {
    async fn open(&self, viewer_url: &str) -> SummarizeResult<()> {
        self.tx
            .send(viewer_url.to_string())
            .map_err(|_| SummarizeError::surface("结果页上下文已退出"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SummaryStats;

    #[test]
    fn test_key_url_shape() {
        let url = viewer_url_for_key("summary_1700000000000_a1b2c3d4e");
        assert_eq!(url, "viewer.html?key=summary_1700000000000_a1b2c3d4e");
    }

    #[test]
    fn test_payload_url_is_percent_encoded() {
        let payload = SummaryPayload {
            summary: vec![],
            stats: SummaryStats::default(),
            llm: None,
            pdf_url: "https://host/doc.pdf".to_string(),
        };
        let url = viewer_url_for_payload(&payload).unwrap();
        assert!(url.starts_with("viewer.html?data="));
        // JSON 原文不应裸露在 URL 里
        assert!(!url.contains('{'));
        assert!(!url.contains('"'));
    }
}
