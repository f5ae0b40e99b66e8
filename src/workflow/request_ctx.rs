//! 请求上下文
//!
//! 封装"我正在处理第几号摘要请求"这一信息

use std::fmt::Display;

/// 请求上下文
///
/// 协调器为每个命令分配递增的 `request_id`，
/// 该 id 同时打在所有状态事件上，供监听者在并发请求下做关联
#[derive(Debug, Clone)]
pub struct RequestCtx {
    /// 请求编号（进程内单调递增）
    pub request_id: u64,

    /// 原始的文档定位符（仅用于日志显示）
    pub document_ref: String,
}

impl RequestCtx {
    /// 创建新的请求上下文
    pub fn new(request_id: u64, document_ref: impl Into<String>) -> Self {
        Self {
            request_id,
            document_ref: document_ref.into(),
        }
    }
}

impl Display for RequestCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[请求 {}] {}", self.request_id, self.document_ref)
    }
}
