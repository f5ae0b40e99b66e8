use crate::models::SummaryStats;
use std::fmt;

/// 摘要请求的错误类型
///
/// 每个变体对应流水线中一个终止原因；所有错误对当前请求都是终态，
/// 不重试、不回滚。错误的 Display 文本即状态总线 `error` 事件携带的消息
#[derive(Debug)]
pub enum SummarizeError {
    /// 无法确定可用的文档地址
    Resolution { reason: String },
    /// 用户配置的服务端地址不合法
    Endpoint { reason: String },
    /// 获取文档失败（传输层错误或非成功状态码）
    Fetch {
        url: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// 后端服务返回非成功状态码
    Backend { status: u16 },
    /// 无法连接后端服务
    BackendTransport {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 后端 HTTP 成功但应用层报告失败（响应体带 error 字段）
    BackendProcessing { message: String },
    /// 后端响应体不是合法 JSON
    ResponseParse {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 后端返回了空摘要（语义上的失败，携带统计用于诊断）
    EmptyResult { stats: SummaryStats },
    /// 打开结果页失败
    Surface { message: String },
    /// 浏览器探针错误
    Browser {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for SummarizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummarizeError::Resolution { reason } => {
                write!(f, "无法解析文档地址: {}", reason)
            }
            SummarizeError::Endpoint { reason } => {
                write!(f, "服务端地址不合法: {}", reason)
            }
            SummarizeError::Fetch {
                url,
                status: Some(status),
                ..
            } => {
                write!(f, "获取 PDF 失败 ({}): 状态码 {}", url, status)
            }
            SummarizeError::Fetch {
                url,
                source: Some(source),
                ..
            } => {
                write!(f, "获取 PDF 失败 ({}): {}", url, source)
            }
            SummarizeError::Fetch { url, .. } => {
                write!(f, "获取 PDF 失败 ({})", url)
            }
            SummarizeError::Backend { status } => {
                write!(f, "后端错误: {}", status)
            }
            SummarizeError::BackendTransport { source } => {
                write!(f, "无法连接后端服务: {}", source)
            }
            SummarizeError::BackendProcessing { message } => {
                write!(f, "后端处理错误: {}", message)
            }
            SummarizeError::ResponseParse { source } => {
                write!(f, "后端响应解析失败: {}", source)
            }
            SummarizeError::EmptyResult { stats } => {
                write!(f, "未生成摘要，后端统计: {}", stats)
            }
            SummarizeError::Surface { message } => {
                write!(f, "打开结果页失败: {}", message)
            }
            SummarizeError::Browser { source } => {
                write!(f, "浏览器探针错误: {}", source)
            }
        }
    }
}

impl std::error::Error for SummarizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SummarizeError::Fetch {
                source: Some(source),
                ..
            }
            | SummarizeError::BackendTransport { source }
            | SummarizeError::ResponseParse { source }
            | SummarizeError::Browser { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for SummarizeError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        SummarizeError::Browser {
            source: Box::new(err),
        }
    }
}

impl From<serde_json::Error> for SummarizeError {
    fn from(err: serde_json::Error) -> Self {
        SummarizeError::ResponseParse {
            source: Box::new(err),
        }
    }
}

// ========== 便捷构造函数 ==========

impl SummarizeError {
    /// 创建地址解析错误
    pub fn resolution(reason: impl Into<String>) -> Self {
        SummarizeError::Resolution {
            reason: reason.into(),
        }
    }

    /// 创建服务端地址错误
    pub fn endpoint(reason: impl Into<String>) -> Self {
        SummarizeError::Endpoint {
            reason: reason.into(),
        }
    }

    /// 创建带状态码的获取错误
    pub fn fetch_status(url: impl Into<String>, status: u16) -> Self {
        SummarizeError::Fetch {
            url: url.into(),
            status: Some(status),
            source: None,
        }
    }

    /// 创建传输层获取错误
    pub fn fetch_transport(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SummarizeError::Fetch {
            url: url.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// 创建结果页打开错误
    pub fn surface(message: impl Into<String>) -> Self {
        SummarizeError::Surface {
            message: message.into(),
        }
    }
}

/// 流水线结果类型
pub type SummarizeResult<T> = Result<T, SummarizeError>;
