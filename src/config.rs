/// 程序配置
///
/// 区别于跨会话持久化的 `UserSettings`：这里是进程级的运行参数，
/// 全部可以通过环境变量覆盖
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口（探针能力需要）
    pub browser_debug_port: u16,
    /// 用户设置文件路径
    pub settings_file: String,
    /// 状态总线的广播缓冲容量
    pub status_bus_capacity: usize,
    /// 交接条目的过期时间（秒），孤儿条目超时后被清理
    pub handoff_ttl_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            settings_file: "settings.toml".to_string(),
            status_bus_capacity: 32,
            handoff_ttl_secs: 600,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            settings_file: std::env::var("SETTINGS_FILE").unwrap_or(default.settings_file),
            status_bus_capacity: std::env::var("STATUS_BUS_CAPACITY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.status_bus_capacity),
            handoff_ttl_secs: std::env::var("HANDOFF_TTL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.handoff_ttl_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
