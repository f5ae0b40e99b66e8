use serde::{Deserialize, Serialize};
use std::fmt;

/// 摘要条目
///
/// 对应后端返回的单条抽取式摘要句子，`page` 从 1 开始
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Excerpt {
    pub text: String,
    pub page: u32,
    pub score: f64,
}

/// 后端统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub num_sentences: u32,
    pub num_pages: u32,
    pub max_words: u32,
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} 句 / {} 页 / 词数预算 {}",
            self.num_sentences, self.num_pages, self.max_words
        )
    }
}

/// 后端 `/summarize` 接口的原始响应（wire 格式）
///
/// 注意：HTTP 200 并不代表处理成功，`error` 字段表示应用层失败；
/// `llm_error` 表示抽取式摘要成功但 LLM 润色失败（非致命）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: Vec<Excerpt>,
    #[serde(default)]
    pub stats: SummaryStats,
    #[serde(default)]
    pub llm_summary: Option<String>,
    #[serde(default)]
    pub llm_error: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// 校验通过后的摘要结果
///
/// 由 `SummarizeClient` 对 `SummaryResponse` 做完应用层校验后产出，此后不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    pub excerpts: Vec<Excerpt>,
    pub stats: SummaryStats,
    pub llm_narrative: Option<String>,
}

/// 交接载荷
///
/// 写入 HandoffStore、由结果页一次性消费的完整内容。
/// 字段名沿用结果页的 JSON 约定（`pdfUrl` 为 camelCase），
/// 以便 `?data=` 内联通道与存储通道共用同一份序列化格式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryPayload {
    pub summary: Vec<Excerpt>,
    pub stats: SummaryStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<String>,
    #[serde(rename = "pdfUrl")]
    pub pdf_url: String,
}

impl SummaryPayload {
    /// 由校验后的结果和最终文档地址组装载荷
    pub fn from_result(result: SummaryResult, pdf_url: String) -> Self {
        Self {
            summary: result.excerpts,
            stats: result.stats,
            llm: result.llm_narrative,
            pdf_url,
        }
    }
}

/// 一次摘要请求的参数
///
/// 在控制面构造并完成钳制，提交后不可变
#[derive(Debug, Clone)]
pub struct RequestParams {
    /// 文档定位符：直接的 PDF 地址，或包裹它的查看器页面地址
    pub document_ref: String,
    /// 后端服务地址（可带或不带末尾斜杠）
    pub server_endpoint: String,
    /// 摘要词数预算，已钳制到 [100, 1200]
    pub max_words: u32,
    /// LLM 模型名（可选，缺省由后端决定）
    pub llm_model: Option<String>,
    /// LLM token 上限（可选），已钳制到 [200, 2000]
    pub token_limit: Option<u32>,
}
