//! 状态总线 - 业务能力层
//!
//! 尽力而为的生命周期事件广播。发起请求的控制面随时可能被用户关掉，
//! 所以广播失败（没有任何接收者）必须静默吞掉，绝不能让流水线中断

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// 事件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Progress,
    Error,
    Done,
}

/// 生命周期事件
///
/// 不持久化，每个监听者至多收到一次，广播时无人监听就丢失。
/// `request_id` 让监听者在并发请求下能区分事件属于哪一次请求；
/// 对监听者而言 `done` 是该请求的终态，之后不会再有事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    pub request_id: u64,
    pub kind: StatusKind,
    pub message: String,
}

/// 状态总线
#[derive(Clone)]
pub struct StatusBus {
    tx: broadcast::Sender<StatusEvent>,
}

impl StatusBus {
    /// 创建总线，`capacity` 是每个接收者的缓冲长度
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 订阅事件流
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.tx.subscribe()
    }

    /// 广播一个事件
    ///
    /// 永不失败：没有接收者时事件被丢弃
    pub fn broadcast(&self, event: StatusEvent) {
        debug!(
            "[请求 {}] 广播状态: {:?} - {}",
            event.request_id, event.kind, event.message
        );
        let _ = self.tx.send(event);
    }

    pub fn progress(&self, request_id: u64, message: impl Into<String>) {
        self.broadcast(StatusEvent {
            request_id,
            kind: StatusKind::Progress,
            message: message.into(),
        });
    }

    pub fn error(&self, request_id: u64, message: impl Into<String>) {
        self.broadcast(StatusEvent {
            request_id,
            kind: StatusKind::Error,
            message: message.into(),
        });
    }

    pub fn done(&self, request_id: u64, message: impl Into<String>) {
        self.broadcast(StatusEvent {
            request_id,
            kind: StatusKind::Done,
            message: message.into(),
        });
    }
}

impl Default for StatusBus {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_without_listener_is_silent() {
        let bus = StatusBus::new(4);
        // 没有任何订阅者也不能 panic 或报错
        bus.progress(1, "正在获取 PDF...");
        bus.error(1, "后端错误: 500");
        bus.done(1, "摘要已生成！");
    }

    #[tokio::test]
    async fn test_listener_receives_events_in_order() {
        let bus = StatusBus::new(8);
        let mut rx = bus.subscribe();

        bus.progress(7, "第一步");
        bus.done(7, "完成");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, StatusKind::Progress);
        assert_eq!(first.request_id, 7);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, StatusKind::Done);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&StatusKind::Progress).unwrap();
        assert_eq!(json, "\"progress\"");
        let json = serde_json::to_string(&StatusKind::Done).unwrap();
        assert_eq!(json, "\"done\"");
    }
}
