//! 控制面 - 编排层
//!
//! 短命的交互前端：收集参数、钳制取值、发出一条 summarize 命令
//! 就可以关掉。它不等待结果，结果通过状态总线和结果页可见。
//!
//! 另外保留一条直连路径：不经过后台协调器，自己取字节、
//! 自己调后端、用内联载荷打开结果页（对应无后台介入的场景）

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::infrastructure::JsExecutor;
use crate::models::{RequestParams, SummaryPayload, UserSettings};
use crate::orchestrator::background::{BackgroundHandle, SummarizeCommand};
use crate::services::surface_opener::viewer_url_for_payload;
use crate::services::{resolver, DocumentFetcher, SettingsStore, SummaryBackend, SurfaceOpener};

/// 控制面
pub struct ControlPanel {
    settings_store: SettingsStore,
    handle: BackgroundHandle,
    fetcher: Arc<dyn DocumentFetcher>,
    backend: Arc<dyn SummaryBackend>,
    opener: Arc<dyn SurfaceOpener>,
}

impl ControlPanel {
    pub fn new(
        settings_store: SettingsStore,
        handle: BackgroundHandle,
        fetcher: Arc<dyn DocumentFetcher>,
        backend: Arc<dyn SummaryBackend>,
        opener: Arc<dyn SurfaceOpener>,
    ) -> Self {
        Self {
            settings_store,
            handle,
            fetcher,
            backend,
            opener,
        }
    }

    /// 经由后台协调器提交一次摘要请求
    ///
    /// 读设置 → 钳制 → 发命令 → 写回设置，随即返回；
    /// 控制面此后关掉与否都不影响流水线
    pub async fn submit_summarize(
        &self,
        displayed_url: &str,
        probe: Option<JsExecutor>,
    ) -> Result<UserSettings> {
        let settings = self.settings_store.load().await.clamped();
        let params = self.build_params(displayed_url, &settings);

        info!("📨 提交摘要请求: {}", displayed_url);
        self.handle.submit(SummarizeCommand { params, probe });

        // 成功提交后写回设置；写失败只警告，不影响已提交的请求
        if let Err(e) = self.settings_store.save(&settings).await {
            warn!("写回用户设置失败: {}", e);
        }

        Ok(settings)
    }

    /// 直连路径：不经过后台协调器
    ///
    /// 自己取字节、调后端，用 `?data=` 内联载荷打开结果页。
    /// 与后台路径不同，这条路径的失败直接返回给调用方
    pub async fn summarize_direct(&self, displayed_url: &str) -> Result<SummaryPayload> {
        let settings = self.settings_store.load().await.clamped();
        let params = self.build_params(displayed_url, &settings);

        let candidate = resolver::resolve_viewer_url(&params.document_ref);
        info!("📨 直连摘要: {}", candidate);

        let document = self
            .fetcher
            .fetch(&candidate)
            .await
            .context("直连路径获取文档失败")?;

        let source_url = document.url.clone();
        let result = self
            .backend
            .summarize(document.bytes, &params)
            .await
            .context("直连路径调用后端失败")?;

        let payload = SummaryPayload::from_result(result, source_url);
        let viewer_url = viewer_url_for_payload(&payload)?;
        self.opener
            .open(&viewer_url)
            .await
            .context("直连路径打开结果页失败")?;

        if let Err(e) = self.settings_store.save(&settings).await {
            warn!("写回用户设置失败: {}", e);
        }

        Ok(payload)
    }

    /// 由设置组装请求参数
    ///
    /// `use_llm` 关掉时不带模型和 token 上限（由后端自行缺省）
    fn build_params(&self, displayed_url: &str, settings: &UserSettings) -> RequestParams {
        RequestParams {
            document_ref: displayed_url.to_string(),
            server_endpoint: settings.server_url.clone(),
            max_words: settings.max_words,
            llm_model: settings
                .use_llm
                .then(|| settings.llm_model.clone()),
            token_limit: settings.use_llm.then_some(settings.token_limit),
        }
    }
}
