//! 输出净化
//!
//! 结构清理（压缩空行、加粗步骤标记）与 HTML 特殊字符转义。
//! 转义顺序固定且 `&` 必须最先替换，否则后续替换引入的实体
//! 会被二次转义。

use once_cell::sync::Lazy;
use regex::Regex;

/// 三个以上连续换行
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// 行首的 "Step N:" 标记
static STEP_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(Step\s*\d+:)").unwrap());

/// 行首的 "Conclusion:" 标记
static CONCLUSION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(Conclusion:)").unwrap());

/// 输出净化器
///
/// 响应交付给浏览器上下文，转义是安全不变量而非外观处理，
/// 必须作为响应离开系统边界前的最后一步执行。
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSanitizer;

impl TextSanitizer {
    /// 创建净化器
    pub fn new() -> Self {
        Self
    }

    /// 结构清理后转义 HTML 特殊字符
    pub fn sanitize(&self, text: &str) -> String {
        let text = EXCESS_NEWLINES.replace_all(text, "\n\n");
        let text = STEP_MARKER.replace_all(&text, "**$1**");
        let text = CONCLUSION_MARKER.replace_all(&text, "**$1**");
        let text = text.trim();

        escape_html(text)
    }
}

/// 转义五个 HTML 特殊字符
///
/// 每次替换作用于前一次替换的结果，顺序不可交换：`&` 在最前。
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}
