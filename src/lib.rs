//! # PDF Summary Relay
//!
//! 一个把"浏览器里正在看的 PDF"送去远端摘要服务、再把结果
//! 递回结果页的跨上下文编排系统。难点不在渲染，而在三个互相
//! 隔离、只能靠异步消息和共享键值存储沟通的执行上下文之间，
//! 协调一次长时间的网络操作并交接一份放不进 URL 的大载荷。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（源页面 Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 探针能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个请求的一个侧面
//! - `resolver` - 查看器 URL 剥离 / 页面内嵌元素探测
//! - `DocumentFetcher` - 按 URL 拉取字节
//! - `SummarizeClient` - 远端摘要服务的 HTTP 契约
//! - `StatusBus` - 尽力而为的生命周期事件广播
//! - `HandoffStore` - 一次性消费的跨上下文交接存储
//! - `SettingsStore` / `SurfaceOpener` - 设置持久化 / 打开结果页
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次请求"的完整处理流程
//! - `RequestCtx` - 上下文封装（request_id + 文档定位符）
//! - `SummarizeFlow` - 流程编排（resolve → fetch → 远端 → 校验 → 发布）
//! - `viewer_flow` - 结果页消费（存储通道优先，内联通道兜底）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/background` - 后台协调器，请求生命周期的唯一驱动者
//! - `orchestrator/control_panel` - 控制面，收集参数发出命令即走

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::connect_and_find_document_page;
pub use config::Config;
pub use error::{SummarizeError, SummarizeResult};
pub use infrastructure::JsExecutor;
pub use models::{RequestParams, SummaryPayload, SummaryResult, UserSettings};
pub use orchestrator::{Background, BackgroundHandle, ControlPanel, SummarizeCommand};
pub use services::{
    HandoffStore, HttpDocumentFetcher, SettingsStore, StatusBus, StatusEvent, StatusKind,
    SummarizeClient,
};
pub use workflow::{RequestCtx, SummarizeFlow};
