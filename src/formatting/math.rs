//! 数学记号格式化
//!
//! 将模型输出中的 LaTeX 风格定界符与运算符字形改写为展示标记，
//! 并为解题步骤与数学符号包裹语义化容器。

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// 块级公式：`$$…$$`，允许跨行
static BLOCK_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$(.*?)\$\$").unwrap());

/// 行内公式：`$…$`，不跨行
static INLINE_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(.*?)\$").unwrap());

/// 独立的单字母符号，允许带单字符下标（x、x_1、T_a）
static SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z](_[0-9a-zA-Z])?\b").unwrap());

/// 不作为数学符号高亮的常见词
const SYMBOL_STOPWORDS: [&str; 8] = ["a", "an", "the", "in", "on", "at", "to", "for"];

/// 数学记号格式化器
///
/// 纯文本到文本的变换，按固定顺序执行各阶段，总是返回字符串。
/// 两次应用同一输入的结果不保证一致：第一遍插入的标记会被
/// 第二遍重新扫描。
#[derive(Debug, Clone, Copy, Default)]
pub struct MathNotationFormatter;

impl MathNotationFormatter {
    /// 创建格式化器
    pub fn new() -> Self {
        Self
    }

    /// 执行完整的格式化流水线
    pub fn format(&self, text: &str) -> String {
        // 1-2. 运算符字形：`**` 视为幂，`*` 视为乘号
        let text = text.replace("**", "^");
        let text = text.replace('*', "×");

        // 3-4. 美元定界的公式，块级先于行内
        let text = BLOCK_MATH
            .replace_all(&text, |caps: &regex::Captures| {
                format!(r#"<div class="equation">{}</div>"#, caps[1].trim())
            })
            .into_owned();
        let text = INLINE_MATH
            .replace_all(&text, |caps: &regex::Captures| {
                format!(r#"<span class="math-expression">{}</span>"#, caps[1].trim())
            })
            .into_owned();

        // 5. 空行分隔的解题步骤
        let text = self.wrap_steps(&text);

        // 6. 数学符号高亮
        self.highlight_symbols(&text)
    }

    /// 以空行为界切分步骤，非空步骤包裹进步骤容器
    fn wrap_steps(&self, text: &str) -> String {
        text.split("\n\n")
            .filter(|step| !step.trim().is_empty())
            .map(|step| format!(r#"<div class="solution-step">{}</div>"#, step.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 高亮数学符号
    ///
    /// 单次从左到右扫描，每个不同的符号只包裹第一次出现，
    /// 替换区间互不重叠。停用词不高亮。
    fn highlight_symbols(&self, text: &str) -> String {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut spans: Vec<(usize, usize)> = Vec::new();

        for m in SYMBOL.find_iter(text) {
            let token = m.as_str();
            if SYMBOL_STOPWORDS.contains(&token) {
                continue;
            }
            if seen.insert(token) {
                spans.push((m.start(), m.end()));
            }
        }

        if spans.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len() + spans.len() * 28);
        let mut last = 0;
        for (start, end) in spans {
            out.push_str(&text[last..start]);
            out.push_str(r#"<span class="symbol">"#);
            out.push_str(&text[start..end]);
            out.push_str("</span>");
            last = end;
        }
        out.push_str(&text[last..]);
        out
    }
}
