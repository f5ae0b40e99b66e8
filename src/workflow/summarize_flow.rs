//! 摘要处理流程 - 流程层
//!
//! 核心职责：定义"一次摘要请求"的完整处理流程
//!
//! 流程顺序：
//! 1. 解析文档地址（查看器参数 → 页面探测回退）
//! 2. 获取字节 → 调用远端摘要服务 → 校验响应
//! 3. 发布交接条目并打开结果页 → 广播 done
//!
//! 流程自身不捕获错误：任何一步失败直接向上返回，
//! 由协调器统一转成唯一一条 `error` 事件。
//! 交接写入只在全部校验通过后发生，之前的失败不留任何残留

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::SummarizeResult;
use crate::infrastructure::JsExecutor;
use crate::models::{RequestParams, SummaryPayload};
use crate::services::surface_opener::viewer_url_for_key;
use crate::services::{
    resolver, DocumentFetcher, FetchedDocument, HandoffStore, StatusBus, SummaryBackend,
    SurfaceOpener,
};
use crate::workflow::request_ctx::RequestCtx;

/// 摘要处理流程
///
/// - 编排完整的请求处理流程
/// - 不持有浏览器资源（探针按请求传入，可有可无）
/// - 只依赖业务能力（services），协作者全部可注入
pub struct SummarizeFlow {
    fetcher: Arc<dyn DocumentFetcher>,
    backend: Arc<dyn SummaryBackend>,
    opener: Arc<dyn SurfaceOpener>,
    store: HandoffStore,
    bus: StatusBus,
}

impl SummarizeFlow {
    /// 创建新的摘要流程
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        backend: Arc<dyn SummaryBackend>,
        opener: Arc<dyn SurfaceOpener>,
        store: HandoffStore,
        bus: StatusBus,
    ) -> Self {
        Self {
            fetcher,
            backend,
            opener,
            store,
            bus,
        }
    }

    /// 执行一次完整的摘要请求
    ///
    /// 探针能力缺失时页面探测回退整体跳过，其余阶段照常
    pub async fn run(
        &self,
        params: &RequestParams,
        probe: Option<&JsExecutor>,
        ctx: &RequestCtx,
    ) -> SummarizeResult<()> {
        self.bus.progress(ctx.request_id, "正在获取 PDF...");

        // ========== 阶段 1: 解析文档地址 ==========
        let candidate = self.resolve_candidate(params, probe, ctx).await;

        // ========== 阶段 2: 获取字节（含内容类型回退）==========
        let document = self.fetch_with_fallback(&candidate, probe, ctx).await?;

        // ========== 阶段 3-5: 调用远端并校验 ==========
        self.bus.progress(ctx.request_id, "正在调用 AI 摘要...");
        info!(
            "[请求 {}] 📤 提交 {} 字节给摘要后端",
            ctx.request_id,
            document.bytes.len()
        );

        let source_url = document.url.clone();
        let result = self.backend.summarize(document.bytes, params).await?;

        info!(
            "[请求 {}] ✓ 摘要完成: {} 条 ({})",
            ctx.request_id,
            result.excerpts.len(),
            result.stats
        );

        // ========== 阶段 6: 发布并打开结果页 ==========
        self.bus.progress(ctx.request_id, "正在打开结果页...");

        let key = HandoffStore::make_summary_key();
        let payload = SummaryPayload::from_result(result, source_url);
        self.store.put(&key, payload);
        self.opener.open(&viewer_url_for_key(&key)).await?;

        // ========== 阶段 7: 完成 ==========
        self.bus.done(ctx.request_id, "摘要已生成！");
        info!("[请求 {}] ✅ 流程结束", ctx.request_id);

        Ok(())
    }

    /// 确定第一候选地址
    ///
    /// 有源页面时优先以页面自身的 URL 为准（用户正在看的才是真相），
    /// 页面 URL 拿不到就降级用传入的定位符；两条路都走查看器参数剥离
    async fn resolve_candidate(
        &self,
        params: &RequestParams,
        probe: Option<&JsExecutor>,
        ctx: &RequestCtx,
    ) -> String {
        if let Some(executor) = probe {
            match executor.current_url().await {
                Ok(page_url) => {
                    let resolved = resolver::resolve_viewer_url(&page_url);
                    debug!("[请求 {}] 源页面地址解析为: {}", ctx.request_id, resolved);
                    return resolved;
                }
                Err(e) => {
                    warn!(
                        "[请求 {}] 读取源页面 URL 失败，改用传入地址: {}",
                        ctx.request_id, e
                    );
                }
            }
        }
        resolver::resolve_viewer_url(&params.document_ref)
    }

    /// 获取字节，必要时做页面探测回退
    ///
    /// 第一候选的内容类型不像 PDF 且探针可用时，扫描页面内嵌元素并二次获取；
    /// 二次获取成功则以它的字节和 URL 为准，任何探测失败都降级沿用原始字节
    async fn fetch_with_fallback(
        &self,
        candidate: &str,
        probe: Option<&JsExecutor>,
        ctx: &RequestCtx,
    ) -> SummarizeResult<FetchedDocument> {
        let document = self.fetcher.fetch(candidate).await?;

        if document.looks_like_pdf() {
            return Ok(document);
        }

        let Some(executor) = probe else {
            debug!(
                "[请求 {}] 内容类型不像 PDF ({}) 且无探针能力，按原始字节继续",
                ctx.request_id, document.content_type
            );
            return Ok(document);
        };

        info!(
            "[请求 {}] 🔍 内容类型不像 PDF ({})，探测页面内嵌元素...",
            ctx.request_id, document.content_type
        );

        match resolver::probe_embedded_source(executor).await {
            Ok(Some(embedded_url)) => match self.fetcher.fetch(&embedded_url).await {
                Ok(embedded) => {
                    info!(
                        "[请求 {}] ✓ 改用内嵌文档: {}",
                        ctx.request_id, embedded.url
                    );
                    Ok(embedded)
                }
                Err(e) => {
                    warn!(
                        "[请求 {}] 内嵌地址二次获取失败，按原始字节继续: {}",
                        ctx.request_id, e
                    );
                    Ok(document)
                }
            },
            Ok(None) => Ok(document),
            Err(e) => {
                warn!(
                    "[请求 {}] 注入探测脚本失败，按原始字节继续: {}",
                    ctx.request_id, e
                );
                Ok(document)
            }
        }
    }
}
