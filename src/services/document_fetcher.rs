//! 文档获取服务 - 业务能力层
//!
//! 只负责"按 URL 拉取字节"的能力。流水线通过 trait 依赖它，
//! 测试时可以注入假实现来构造各种获取结果

use async_trait::async_trait;
use tracing::debug;

use crate::error::{SummarizeError, SummarizeResult};

/// 一次获取的产物：字节、响应内容类型和最终 URL
///
/// 内容类型用于判断是否需要走页面探测回退；URL 跟随重定向后的实际地址
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub url: String,
}

impl FetchedDocument {
    /// 内容类型是否表明这就是 PDF
    pub fn looks_like_pdf(&self) -> bool {
        self.content_type.contains("pdf")
    }
}

/// 文档获取能力
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// 拉取 URL 指向的字节
    ///
    /// 传输失败或非成功状态码都映射为 `SummarizeError::Fetch`
    async fn fetch(&self, url: &str) -> SummarizeResult<FetchedDocument>;
}

/// 基于 reqwest 的默认实现
pub struct HttpDocumentFetcher {
    http: reqwest::Client,
}

impl HttpDocumentFetcher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpDocumentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch(&self, url: &str) -> SummarizeResult<FetchedDocument> {
        debug!("正在获取文档: {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SummarizeError::fetch_transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizeError::fetch_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let final_url = response.url().to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SummarizeError::fetch_transport(url, e))?;

        debug!(
            "获取完成: {} ({} 字节, 内容类型: {})",
            final_url,
            bytes.len(),
            content_type
        );

        Ok(FetchedDocument {
            bytes: bytes.to_vec(),
            content_type,
            url: final_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_pdf() {
        let doc = FetchedDocument {
            bytes: vec![],
            content_type: "application/pdf".to_string(),
            url: "https://host/doc.pdf".to_string(),
        };
        assert!(doc.looks_like_pdf());

        let wrapped = FetchedDocument {
            bytes: vec![],
            content_type: "text/html; charset=utf-8".to_string(),
            url: "https://viewer.example/show".to_string(),
        };
        assert!(!wrapped.looks_like_pdf());
    }
}
