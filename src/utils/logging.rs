/// 日志工具模块
///
/// 提供 tracing 初始化和日志格式化的辅助函数
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 优先读 RUST_LOG；没有设置时按 `verbose` 落到 debug / info
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // 测试里可能被多次调用，重复初始化不算错误
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短句", 10), "短句");
        assert_eq!(truncate_text("一二三四五", 3), "一二三...");
    }
}
