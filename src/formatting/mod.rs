//! 响应文本格式化模块
//!
//! 数学记号规范化与输出净化。美元定界的数学表达式只在
//! `math` 阶段处理一次，`sanitize` 负责结构清理与 HTML 转义，
//! 转义是响应离开系统边界前的最后一步。

pub mod math;
pub mod sanitize;

pub use math::MathNotationFormatter;
pub use sanitize::TextSanitizer;
