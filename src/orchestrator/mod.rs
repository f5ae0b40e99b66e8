//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责请求生命周期的调度，是整个系统的"指挥中心"。
//!
//! ### `background` - 后台协调器
//! - 接收控制面的命令并立即应答（发后不理）
//! - 为每个请求分配 id、spawn 独立的流水线任务
//! - 统一把失败转成唯一一条 error 事件
//!
//! ### `control_panel` - 控制面
//! - 读取/钳制/写回用户设置
//! - 发出 summarize 命令，或走不经过后台的直连路径
//!
//! ## 层次关系
//!
//! ```text
//! control_panel (收集参数，发一条命令)
//!     ↓ mpsc
//! background (请求生命周期的唯一驱动者)
//!     ↓
//! workflow::SummarizeFlow (单次请求的完整流程)
//!     ↓
//! services (能力层：resolver / fetch / backend / bus / store / opener)
//!     ↓
//! infrastructure (基础设施：JsExecutor 探针)
//! ```

pub mod background;
pub mod control_panel;

pub use background::{Background, BackgroundHandle, SummarizeCommand};
pub use control_panel::ControlPanel;
