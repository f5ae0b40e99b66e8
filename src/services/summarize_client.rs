//! 摘要后端客户端 - 业务能力层
//!
//! 封装所有与远端摘要服务相关的调用逻辑：
//! 拼接端点、构造 multipart 请求、校验响应。
//! 远端服务本身是黑盒协作者，只依赖文档化的 HTTP 契约

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::error::{SummarizeError, SummarizeResult};
use crate::models::{RequestParams, SummaryResponse, SummaryResult};

/// 摘要路径，拼接在服务端地址之后
const SUMMARIZE_PATH: &str = "summarize";

/// 摘要能力
///
/// 流水线通过这个 trait 调用远端服务，测试时注入假后端
/// 来构造任意响应场景
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// 把文档字节交给远端服务并返回校验过的结果
    async fn summarize(
        &self,
        bytes: Vec<u8>,
        params: &RequestParams,
    ) -> SummarizeResult<SummaryResult>;
}

/// 基于 reqwest 的默认后端客户端
pub struct SummarizeClient {
    http: reqwest::Client,
}

impl SummarizeClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// 拼接摘要端点
    ///
    /// 去掉服务端地址末尾的斜杠，追加固定路径，
    /// 再挂上 `max_words` / `llm=true` / 可选 `model` / 可选 `token_limit`
    pub fn build_endpoint(params: &RequestParams) -> SummarizeResult<Url> {
        let base = params.server_endpoint.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, SUMMARIZE_PATH))
            .map_err(|e| SummarizeError::endpoint(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("max_words", &params.max_words.to_string());
            query.append_pair("llm", "true");
            if let Some(model) = &params.llm_model {
                query.append_pair("model", model);
            }
            if let Some(token_limit) = params.token_limit {
                query.append_pair("token_limit", &token_limit.to_string());
            }
        }

        Ok(url)
    }

    /// 校验远端响应
    ///
    /// HTTP 成功之后仍有两类语义失败：
    /// - 响应体带 `error` 字段（远端传输成功但处理失败）
    /// - `summary` 缺失或为空（空摘要对用户永远没有价值，按失败处理）
    ///
    /// `llm_error` 不致命：抽取式摘要已经可用，只记一条警告
    pub fn validate_response(response: SummaryResponse) -> SummarizeResult<SummaryResult> {
        if let Some(message) = response.error {
            return Err(SummarizeError::BackendProcessing { message });
        }

        if response.summary.is_empty() {
            return Err(SummarizeError::EmptyResult {
                stats: response.stats,
            });
        }

        if let Some(llm_error) = &response.llm_error {
            warn!("LLM 润色失败（抽取式摘要照常返回）: {}", llm_error);
        }

        Ok(SummaryResult {
            excerpts: response.summary,
            stats: response.stats,
            llm_narrative: response.llm_summary,
        })
    }
}

impl Default for SummarizeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummaryBackend for SummarizeClient {
    async fn summarize(
        &self,
        bytes: Vec<u8>,
        params: &RequestParams,
    ) -> SummarizeResult<SummaryResult> {
        let endpoint = Self::build_endpoint(params)?;
        debug!("调用摘要后端: {} ({} 字节)", endpoint, bytes.len());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("document.pdf")
            .mime_str("application/pdf")
            .map_err(|e| SummarizeError::BackendTransport {
                source: Box::new(e),
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SummarizeError::BackendTransport {
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizeError::Backend {
                status: status.as_u16(),
            });
        }

        let body: SummaryResponse =
            response
                .json()
                .await
                .map_err(|e| SummarizeError::BackendTransport {
                    source: Box::new(e),
                })?;

        Self::validate_response(body)
    }
}
