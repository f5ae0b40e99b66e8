//! JS 执行器 - 基础设施层
//!
//! 持有源页面的 Page 资源，只暴露"执行 JS"的探针能力。
//! 解析器把它当作可选的能力型依赖：能力缺失时回退逻辑整体跳过，
//! 绝不因此失败

use anyhow::{Context, Result};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// JS 执行器
///
/// 职责：
/// - 持有源上下文的 Page 资源
/// - 暴露 eval() 能力和页面自身的 URL
/// - 不认识摘要 / 交接 / 状态事件
/// - 不处理业务流程
#[derive(Clone)]
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 源页面当前的 URL
    ///
    /// 探测到的相对 src 需要以它为基准解析成绝对地址
    pub async fn current_url(&self) -> Result<String> {
        self.page
            .url()
            .await?
            .context("源页面没有 URL")
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}
