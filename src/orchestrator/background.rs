//! 后台协调器 - 编排层
//!
//! ## 职责
//!
//! 本模块是请求生命周期的唯一驱动者：
//!
//! 1. **命令接收**：通过 mpsc 接收控制面的 summarize 命令，立即返回
//! 2. **独立生命周期**：流水线作为独立任务运行，不持有任何
//!    以控制面存活为前提的引用，控制面关掉后照常跑完
//! 3. **请求编号**：为每个命令分配递增 id，打在所有状态事件上
//! 4. **错误收口**：流程的任何失败在这里统一记日志并转成
//!    恰好一条 `error` 事件；`submit` 永远不向调用方返回失败
//! 5. **并发不串行**：并发请求互不排队，各自独立的键和事件
//!
//! ## 设计原则
//!
//! - **发后不理**：所有结果只能通过状态总线和交接存储观察
//! - **向下委托**：具体阶段交给 workflow::SummarizeFlow

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info};

use crate::infrastructure::JsExecutor;
use crate::models::RequestParams;
use crate::services::{
    DocumentFetcher, HandoffStore, StatusBus, StatusEvent, SummaryBackend, SurfaceOpener,
};
use crate::workflow::{RequestCtx, SummarizeFlow};

/// 控制面发给协调器的命令
///
/// `probe` 是可选的源页面探针能力；确认送达即算应答，结果不走返回值
pub struct SummarizeCommand {
    pub params: RequestParams,
    pub probe: Option<JsExecutor>,
}

/// 协调器句柄
///
/// 控制面和结果页各持一份 clone；协调器任务退出后
/// `submit` 静默丢弃命令（发后不理的语义不变）
#[derive(Clone)]
pub struct BackgroundHandle {
    tx: mpsc::UnboundedSender<SummarizeCommand>,
    bus: StatusBus,
    store: HandoffStore,
}

impl BackgroundHandle {
    /// 提交一次摘要请求
    ///
    /// 永不同步失败；所有结局只通过状态总线和交接存储可见
    pub fn submit(&self, command: SummarizeCommand) {
        let _ = self.tx.send(command);
    }

    /// 订阅状态事件
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.bus.subscribe()
    }

    /// 共享的交接存储（结果页上下文消费用）
    pub fn store(&self) -> HandoffStore {
        self.store.clone()
    }
}

/// 后台协调器
pub struct Background;

impl Background {
    /// 启动协调器任务并返回句柄
    ///
    /// 每个命令 spawn 一个独立的流水线任务，命令循环自身不被单个请求阻塞
    pub fn spawn(
        fetcher: Arc<dyn DocumentFetcher>,
        backend: Arc<dyn SummaryBackend>,
        opener: Arc<dyn SurfaceOpener>,
        store: HandoffStore,
        bus: StatusBus,
    ) -> BackgroundHandle {
        let (tx, mut rx) = mpsc::unbounded_channel::<SummarizeCommand>();

        let handle = BackgroundHandle {
            tx,
            bus: bus.clone(),
            store: store.clone(),
        };

        tokio::spawn(async move {
            let flow = Arc::new(SummarizeFlow::new(fetcher, backend, opener, store, bus.clone()));
            let mut next_request_id: u64 = 1;

            info!("🚀 后台协调器已启动");

            while let Some(command) = rx.recv().await {
                let ctx = RequestCtx::new(next_request_id, &command.params.document_ref);
                next_request_id += 1;

                let flow = flow.clone();
                let bus = bus.clone();

                tokio::spawn(async move {
                    info!("{} 📨 收到摘要请求", ctx);

                    if let Err(e) = flow
                        .run(&command.params, command.probe.as_ref(), &ctx)
                        .await
                    {
                        error!("[请求 {}] ❌ 摘要流程失败: {}", ctx.request_id, e);
                        bus.error(ctx.request_id, e.to_string());
                    }
                });
            }

            info!("后台协调器退出");
        });

        handle
    }
}
