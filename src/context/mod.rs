//! 对话上下文模块
//!
//! 维护每个会话的滚动交互历史，并根据提问关键词推导粗粒度的
//! 主题与难度分类。

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

pub use store::ContextStore;

/// 默认保留的交互数
pub const DEFAULT_MAX_HISTORY: usize = 5;

/// 一次完整的问答交互
///
/// 入库后不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// 交互唯一标识
    pub id: String,
    /// 用户提问
    pub query: String,
    /// 生成的回答
    pub response: String,
    /// 记录时间
    pub recorded_at: DateTime<Utc>,
}

impl Interaction {
    /// 创建新交互
    pub fn new(query: &str, response: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            query: query.to_string(),
            response: response.to_string(),
            recorded_at: Utc::now(),
        }
    }
}

/// 提问主题分类
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// 数学
    Mathematics,
    /// 科学
    Science,
    /// 语言
    Language,
    /// 历史
    History,
    /// 技术
    Technology,
}

impl Topic {
    /// 主题名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Mathematics => "mathematics",
            Topic::Science => "science",
            Topic::Language => "language",
            Topic::History => "history",
            Topic::Technology => "technology",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 主题关键词表，按固定枚举顺序匹配，先命中者优先
const TOPIC_KEYWORDS: [(Topic, &[&str]); 5] = [
    (
        Topic::Mathematics,
        &["math", "algebra", "geometry", "calculus", "trigonometry"],
    ),
    (Topic::Science, &["physics", "chemistry", "biology", "science"]),
    (
        Topic::Language,
        &["english", "grammar", "writing", "literature"],
    ),
    (
        Topic::History,
        &["history", "historical", "civilization", "era"],
    ),
    (
        Topic::Technology,
        &["computer", "programming", "tech", "coding"],
    ),
];

/// 难度级别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    /// 入门
    Beginner,
    /// 中级
    Intermediate,
    /// 高级
    Advanced,
}

impl Default for DifficultyLevel {
    fn default() -> Self {
        DifficultyLevel::Intermediate
    }
}

impl DifficultyLevel {
    /// 级别名称
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
        }
    }
}

/// 难度指示词表，advanced 优先于 beginner，首个命中即停止
const COMPLEXITY_INDICATORS: [(DifficultyLevel, &[&str]); 2] = [
    (
        DifficultyLevel::Advanced,
        &["prove", "derive", "complex", "advanced", "theoretical"],
    ),
    (
        DifficultyLevel::Beginner,
        &["explain", "what is", "basic", "simple", "introduction"],
    ),
];

/// 会话级对话上下文
///
/// 有界 FIFO：达到容量后先淘汰最旧的交互再追加新交互，
/// 历史长度在任意时刻不超过 `max_history`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// 交互历史（最旧在前）
    history: VecDeque<Interaction>,
    /// 容量上限
    max_history: usize,
    /// 当前主题
    pub current_topic: Option<Topic>,
    /// 当前难度级别
    pub difficulty_level: DifficultyLevel,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl ConversationContext {
    /// 创建新上下文
    pub fn new(max_history: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(max_history),
            max_history,
            current_topic: None,
            difficulty_level: DifficultyLevel::default(),
        }
    }

    /// 追加一次交互，容量满时先淘汰最旧的一条
    pub fn add_interaction(&mut self, query: &str, response: &str) {
        if self.history.len() >= self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(Interaction::new(query, response));
    }

    /// 当前历史长度
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// 历史是否为空
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// 遍历历史（最旧在前）
    pub fn interactions(&self) -> impl Iterator<Item = &Interaction> {
        self.history.iter()
    }

    /// 基于关键词匹配检测提问主题
    ///
    /// 大小写不敏感；按固定枚举顺序返回第一个命中的主题，
    /// 仅在命中时更新 `current_topic`。
    pub fn detect_topic(&mut self, query: &str) -> Option<Topic> {
        let query_lower = query.to_lowercase();

        for (topic, keywords) in TOPIC_KEYWORDS.iter() {
            if keywords.iter().any(|keyword| query_lower.contains(keyword)) {
                self.current_topic = Some(*topic);
                return Some(*topic);
            }
        }

        None
    }

    /// 根据提问中的复杂度指示词调整难度级别
    ///
    /// advanced 指示词优先；无命中时保持原级别不变。
    pub fn adjust_difficulty(&mut self, query: &str) {
        let query_lower = query.to_lowercase();

        for (level, indicators) in COMPLEXITY_INDICATORS.iter() {
            if indicators
                .iter()
                .any(|indicator| query_lower.contains(indicator))
            {
                self.difficulty_level = *level;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_interaction_fifo_eviction() {
        let mut context = ConversationContext::new(5);
        for i in 0..6 {
            context.add_interaction(&format!("query {}", i), &format!("response {}", i));
        }

        assert_eq!(context.len(), 5);
        let oldest = context.interactions().next().unwrap();
        assert_eq!(oldest.query, "query 1");
        let newest = context.interactions().last().unwrap();
        assert_eq!(newest.query, "query 5");
    }

    #[test]
    fn test_history_never_exceeds_capacity() {
        let mut context = ConversationContext::new(3);
        for i in 0..10 {
            context.add_interaction("q", "r");
            assert!(context.len() <= 3, "overflow at iteration {}", i);
        }
    }

    #[test]
    fn test_detect_topic_mathematics() {
        let mut context = ConversationContext::default();
        let topic = context.detect_topic("I need help with calculus");
        assert_eq!(topic, Some(Topic::Mathematics));
        assert_eq!(context.current_topic, Some(Topic::Mathematics));
    }

    #[test]
    fn test_detect_topic_no_match() {
        let mut context = ConversationContext::default();
        context.current_topic = Some(Topic::Science);
        let topic = context.detect_topic("good morning");
        assert_eq!(topic, None);
        // 未命中时不覆盖已有主题
        assert_eq!(context.current_topic, Some(Topic::Science));
    }

    #[test]
    fn test_detect_topic_is_case_insensitive() {
        let mut context = ConversationContext::default();
        assert_eq!(
            context.detect_topic("PHYSICS question"),
            Some(Topic::Science)
        );
    }

    #[test]
    fn test_detect_topic_fixed_order() {
        // "history of mathematics" 同时命中 math 与 history，
        // 枚举顺序决定 mathematics 优先
        let mut context = ConversationContext::default();
        assert_eq!(
            context.detect_topic("the history of mathematics"),
            Some(Topic::Mathematics)
        );
    }

    #[test]
    fn test_adjust_difficulty_beginner() {
        let mut context = ConversationContext::default();
        context.adjust_difficulty("explain what is gravity");
        assert_eq!(context.difficulty_level, DifficultyLevel::Beginner);
    }

    #[test]
    fn test_adjust_difficulty_advanced() {
        let mut context = ConversationContext::default();
        context.adjust_difficulty("prove the derivation");
        assert_eq!(context.difficulty_level, DifficultyLevel::Advanced);
    }

    #[test]
    fn test_adjust_difficulty_advanced_wins_over_beginner() {
        // 同时包含两组指示词时 advanced 先被检查
        let mut context = ConversationContext::default();
        context.adjust_difficulty("explain and prove the theorem");
        assert_eq!(context.difficulty_level, DifficultyLevel::Advanced);
    }

    #[test]
    fn test_adjust_difficulty_no_match_keeps_level() {
        let mut context = ConversationContext::default();
        context.difficulty_level = DifficultyLevel::Advanced;
        context.adjust_difficulty("tell me about photosynthesis");
        assert_eq!(context.difficulty_level, DifficultyLevel::Advanced);
    }

    #[test]
    fn test_default_level_is_intermediate() {
        let context = ConversationContext::default();
        assert_eq!(context.difficulty_level, DifficultyLevel::Intermediate);
        assert!(context.current_topic.is_none());
    }
}
