use serde::{Deserialize, Serialize};

/// 词数预算下限
pub const MAX_WORDS_MIN: u32 = 100;
/// 词数预算上限
pub const MAX_WORDS_MAX: u32 = 1200;
/// token 上限下界
pub const TOKEN_LIMIT_MIN: u32 = 200;
/// token 上限上界
pub const TOKEN_LIMIT_MAX: u32 = 2000;

/// 用户设置
///
/// 跨会话持久化的控制面参数，控制面初始化时读取、每次成功提交后写回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub server_url: String,
    pub max_words: u32,
    pub use_llm: bool,
    pub llm_model: String,
    pub token_limit: u32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_string(),
            max_words: 500,
            use_llm: true,
            llm_model: "gpt-4o-mini".to_string(),
            token_limit: 800,
        }
    }
}

impl UserSettings {
    /// 将数值参数钳制到允许的区间
    ///
    /// 控制面在提交前调用，保证进入流水线的参数永远合法
    pub fn clamped(mut self) -> Self {
        self.max_words = self.max_words.clamp(MAX_WORDS_MIN, MAX_WORDS_MAX);
        self.token_limit = self.token_limit.clamp(TOKEN_LIMIT_MIN, TOKEN_LIMIT_MAX);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_max_words() {
        let low = UserSettings {
            max_words: 50,
            ..Default::default()
        };
        assert_eq!(low.clamped().max_words, 100);

        let high = UserSettings {
            max_words: 5000,
            ..Default::default()
        };
        assert_eq!(high.clamped().max_words, 1200);
    }

    #[test]
    fn test_clamp_token_limit() {
        let low = UserSettings {
            token_limit: 10,
            ..Default::default()
        };
        assert_eq!(low.clamped().token_limit, 200);

        let high = UserSettings {
            token_limit: 9999,
            ..Default::default()
        };
        assert_eq!(high.clamped().token_limit, 2000);
    }

    #[test]
    fn test_in_range_untouched() {
        let s = UserSettings::default().clamped();
        assert_eq!(s.max_words, 500);
        assert_eq!(s.token_limit, 800);
    }
}
