//! 地址解析服务 - 业务能力层
//!
//! 只负责"找出文档真实地址"的能力，不关心流程。
//!
//! 两段式回退：
//! 1. 纯解析：剥开间接查看器 URL 的 `file` 查询参数（无需任何网络访问）
//! 2. 页面探测：内容类型不像 PDF 且探针能力可用时，注入脚本扫描
//!    页面里的 embed / iframe，取其 src 并相对页面地址解析成绝对 URL
//!
//! 间接查看器经常在可见地址上返回一层 HTML 包装而不是原始二进制，
//! 这就是第二段回退存在的原因

use anyhow::{Context, Result};
use tracing::debug;
use url::Url;

use crate::infrastructure::JsExecutor;

/// 扫描页面内嵌 PDF 元素的探测脚本
const EMBED_PROBE_SCRIPT: &str = r#"
(() => {
    const embed = document.querySelector('embed[type="application/pdf"], iframe');
    return embed ? embed.getAttribute("src") : null;
})()
"#;

/// 剥开间接查看器 URL
///
/// `file` 查询参数解码后是绝对 HTTP(S) 地址时返回它；
/// 其余情况（包括根本不是合法 URL）原样返回输入作为第一候选
pub fn resolve_viewer_url(displayed_url: &str) -> String {
    if let Ok(parsed) = Url::parse(displayed_url) {
        for (key, value) in parsed.query_pairs() {
            if key == "file" && (value.starts_with("http://") || value.starts_with("https://")) {
                debug!("从查看器参数解出文档地址: {}", value);
                return value.into_owned();
            }
        }
    }
    displayed_url.to_string()
}

/// 在已渲染的源页面中探测内嵌的文档地址
///
/// 返回解析成绝对地址的 src；页面里没有内嵌元素时返回 None。
/// 调用方应把任何错误降级为"沿用原始字节"，探测永远是尽力而为
pub async fn probe_embedded_source(executor: &JsExecutor) -> Result<Option<String>> {
    let src: Option<String> = executor.eval_as(EMBED_PROBE_SCRIPT).await?;

    let Some(src) = src else {
        debug!("页面中没有内嵌的 PDF 元素");
        return Ok(None);
    };

    // 相对地址以页面自身 URL 为基准
    let page_url = executor.current_url().await?;
    let base = Url::parse(&page_url).with_context(|| format!("页面 URL 不合法: {}", page_url))?;
    let absolute = base
        .join(&src)
        .with_context(|| format!("无法解析内嵌地址: {}", src))?;

    debug!("探测到内嵌文档地址: {}", absolute);
    Ok(Some(absolute.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_file_param_unwrapped() {
        let resolved =
            resolve_viewer_url("https://viewer.example/show?file=https%3A%2F%2Fhost%2Fdoc.pdf");
        assert_eq!(resolved, "https://host/doc.pdf");
    }

    #[test]
    fn test_plain_url_unchanged() {
        let input = "https://host/doc.pdf";
        assert_eq!(resolve_viewer_url(input), input);
    }

    #[test]
    fn test_non_http_file_param_ignored() {
        // file 参数不是绝对 HTTP(S) 地址时不剥开
        let input = "https://viewer.example/show?file=local%2Fdoc.pdf";
        assert_eq!(resolve_viewer_url(input), input);
    }

    #[test]
    fn test_unparseable_input_unchanged() {
        let input = "not a url at all";
        assert_eq!(resolve_viewer_url(input), input);
    }

    #[test]
    fn test_other_params_ignored() {
        let input = "https://viewer.example/show?page=3&zoom=auto";
        assert_eq!(resolve_viewer_url(input), input);
    }

    #[test]
    fn test_http_scheme_accepted() {
        let resolved =
            resolve_viewer_url("https://viewer.example/show?file=http%3A%2F%2Fhost%2Fa.pdf");
        assert_eq!(resolved, "http://host/a.pdf");
    }
}
