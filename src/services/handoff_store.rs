//! 交接存储 - 业务能力层
//!
//! 短命的键值中转：把一份对 URL 和消息通道来说都太大的载荷，
//! 从后台协调器递到刚打开的结果页上下文。
//!
//! 语义要点：
//! - `take_once` 与删除原子：第一次读取即移除，重复打开的结果页
//!   看到的是"不存在"而不是陈旧的重复渲染
//! - 纯内存，不跨进程重启存活（它不是持久存储）
//! - 写入时惰性清理超过 TTL 的孤儿条目（结果页没打开成功的残留），
//!   防止无界增长

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, warn};

use crate::models::SummaryPayload;

/// 孤儿条目的默认过期时间
const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// 交接键的随机后缀长度，对应 base36 的 9 位
const NONCE_LEN: usize = 9;

struct StoredEntry {
    payload: SummaryPayload,
    stored_at: Instant,
}

/// 交接存储
///
/// clone 共享同一份底层表，各上下文各持一份句柄
#[derive(Clone)]
pub struct HandoffStore {
    inner: Arc<Mutex<HashMap<String, StoredEntry>>>,
    ttl: Duration,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// 生成一个交接键：`summary_<毫秒时间戳>_<随机 base36>`
    ///
    /// 同一会话的并发请求之间碰撞概率可以忽略
    pub fn make_summary_key() -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let nonce: String = (0..NONCE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..36);
                char::from_digit(idx, 36).unwrap_or('0')
            })
            .collect();
        format!("summary_{}_{}", millis, nonce)
    }

    /// 写入一个条目
    ///
    /// 顺带清理已超时的孤儿条目
    pub fn put(&self, key: &str, payload: SummaryPayload) {
        let mut map = self.lock();
        Self::sweep_expired(&mut map, self.ttl);
        debug!("写入交接条目: {}", key);
        map.insert(
            key.to_string(),
            StoredEntry {
                payload,
                stored_at: Instant::now(),
            },
        );
    }

    /// 一次性取走条目
    ///
    /// 第一次成功读取即删除，之后对同一键返回 None
    pub fn take_once(&self, key: &str) -> Option<SummaryPayload> {
        let mut map = self.lock();
        match map.remove(key) {
            Some(entry) => {
                debug!("取走交接条目: {}", key);
                Some(entry.payload)
            }
            None => {
                warn!("交接条目不存在或已被消费: {}", key);
                None
            }
        }
    }

    /// 当前条目数（含尚未清理的过期条目）
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep_expired(map: &mut HashMap<String, StoredEntry>, ttl: Duration) {
        let before = map.len();
        map.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        let removed = before - map.len();
        if removed > 0 {
            warn!("清理了 {} 个未被消费的交接条目", removed);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredEntry>> {
        // 持锁期间不会 panic，锁中毒时直接沿用内部数据
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for HandoffStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SummaryStats;

    fn payload(url: &str) -> SummaryPayload {
        SummaryPayload {
            summary: vec![],
            stats: SummaryStats::default(),
            llm: None,
            pdf_url: url.to_string(),
        }
    }

    #[test]
    fn test_take_once_consumes_entry() {
        let store = HandoffStore::new();
        store.put("summary_1_abc", payload("https://host/doc.pdf"));

        let first = store.take_once("summary_1_abc");
        assert_eq!(first.unwrap().pdf_url, "https://host/doc.pdf");

        // 第二次读取观察到"不存在"
        assert!(store.take_once("summary_1_abc").is_none());
    }

    #[test]
    fn test_take_missing_key() {
        let store = HandoffStore::new();
        assert!(store.take_once("summary_0_zzz").is_none());
    }

    #[test]
    fn test_key_format() {
        let key = HandoffStore::make_summary_key();
        let parts: Vec<&str> = key.splitn(3, '_').collect();
        assert_eq!(parts[0], "summary");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), NONCE_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_keys_are_unique() {
        let a = HandoffStore::make_summary_key();
        let b = HandoffStore::make_summary_key();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_orphan_entries_swept_on_put() {
        let store = HandoffStore::with_ttl(Duration::from_millis(10));
        store.put("summary_1_orphan", payload("https://host/a.pdf"));

        tokio::time::sleep(Duration::from_millis(30)).await;

        // 新写入触发清理，孤儿条目消失
        store.put("summary_2_fresh", payload("https://host/b.pdf"));
        assert!(store.take_once("summary_1_orphan").is_none());
        assert!(store.take_once("summary_2_fresh").is_some());
    }

    #[test]
    fn test_concurrent_entries_independent() {
        let store = HandoffStore::new();
        let k1 = HandoffStore::make_summary_key();
        let k2 = HandoffStore::make_summary_key();
        store.put(&k1, payload("https://host/a.pdf"));
        store.put(&k2, payload("https://host/b.pdf"));

        assert_eq!(store.take_once(&k2).unwrap().pdf_url, "https://host/b.pdf");
        assert_eq!(store.take_once(&k1).unwrap().pdf_url, "https://host/a.pdf");
        assert!(store.is_empty());
    }
}
