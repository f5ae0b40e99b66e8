use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use pdf_summary_relay::services::{
    ChannelSurfaceOpener, DocumentFetcher, SummaryBackend, SurfaceOpener,
};
use pdf_summary_relay::utils::logging;
use pdf_summary_relay::workflow::viewer_flow;
use pdf_summary_relay::{
    connect_and_find_document_page, Background, Config, HandoffStore, HttpDocumentFetcher,
    ControlPanel, JsExecutor, SettingsStore, StatusBus, StatusKind, SummarizeClient,
    SummaryPayload,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置并初始化日志
    let config = Config::from_env();
    logging::init(config.verbose_logging);

    let displayed_url = std::env::args()
        .nth(1)
        .context("用法: pdf_summary_relay <PDF 或查看器页面地址>")?;

    // 共享能力：交接存储和状态总线
    let store = HandoffStore::with_ttl(Duration::from_secs(config.handoff_ttl_secs));
    let bus = StatusBus::new(config.status_bus_capacity);
    let fetcher: Arc<dyn DocumentFetcher> = Arc::new(HttpDocumentFetcher::new());
    let backend: Arc<dyn SummaryBackend> = Arc::new(SummarizeClient::new());

    // 结果页上下文：独立任务，和协调器之间只有一条 URL 通道
    let (viewer_tx, viewer_rx) = mpsc::unbounded_channel::<String>();
    let opener: Arc<dyn SurfaceOpener> = Arc::new(ChannelSurfaceOpener::new(viewer_tx));
    let viewer = tokio::spawn(viewer_context(viewer_rx, store.clone()));

    // 后台协调器
    let handle = Background::spawn(
        fetcher.clone(),
        backend.clone(),
        opener.clone(),
        store.clone(),
        bus.clone(),
    );

    // 可选的探针能力：连不上调试端口浏览器就优雅降级
    let (probe, _browser) =
        match connect_and_find_document_page(config.browser_debug_port, Some(&displayed_url)).await
        {
            Ok((browser, page)) => (Some(JsExecutor::new(page)), Some(browser)),
            Err(e) => {
                warn!("浏览器探针不可用，跳过页面探测回退: {}", e);
                (None, None)
            }
        };

    // 控制面：提交完即可消失，流水线照常跑完
    let panel = ControlPanel::new(
        SettingsStore::new(&config.settings_file),
        handle.clone(),
        fetcher,
        backend,
        opener,
    );

    let mut events = handle.subscribe();
    panel.submit_summarize(&displayed_url, probe).await?;

    // 旁听状态事件直到该请求的终态
    loop {
        match events.recv().await {
            Ok(ev) => match ev.kind {
                StatusKind::Progress => info!("[请求 {}] ⏳ {}", ev.request_id, ev.message),
                StatusKind::Done => {
                    info!("[请求 {}] ✅ {}", ev.request_id, ev.message);
                    break;
                }
                StatusKind::Error => {
                    error!("[请求 {}] ❌ {}", ev.request_id, ev.message);
                    break;
                }
            },
            Err(e) => {
                warn!("状态订阅中断: {}", e);
                break;
            }
        }
    }

    // 给结果页上下文留出消费时间
    tokio::time::sleep(Duration::from_millis(200)).await;
    viewer.abort();

    Ok(())
}

/// 结果页上下文
///
/// 收到 URL 后自行解析查询、消费交接存储并"渲染"（这里输出到日志）
async fn viewer_context(mut rx: mpsc::UnboundedReceiver<String>, store: HandoffStore) {
    while let Some(viewer_url) = rx.recv().await {
        match viewer_flow::load_from_url(&viewer_url, &store) {
            Some(payload) => render_summary(&payload),
            None => warn!("结果页没有拿到载荷: {}", viewer_url),
        }
    }
}

fn render_summary(payload: &SummaryPayload) {
    info!("{}", "=".repeat(60));
    info!("📄 {}", payload.pdf_url);
    info!("📊 {}", payload.stats);
    if let Some(llm) = &payload.llm {
        info!("🧠 {}", logging::truncate_text(llm, 200));
    }
    for (i, item) in payload.summary.iter().enumerate() {
        info!(
            "{:>3}. {} (p. {}, score: {:.2})",
            i + 1,
            logging::truncate_text(&item.text, 80),
            item.page,
            item.score
        );
        if let Some(jump) = viewer_flow::page_jump_url(&payload.pdf_url, item.page, &item.text) {
            debug!("     ↪ {}", jump);
        }
    }
    info!("{}", "=".repeat(60));
}
