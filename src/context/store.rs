//! 会话上下文存储
//!
//! 以会话 ID 为键的并发上下文表。所有修改都通过 `with_session`
//! 在分片锁内完成，单个会话同一时刻只有一个写者。

use dashmap::DashMap;

use crate::context::{ConversationContext, DEFAULT_MAX_HISTORY, DifficultyLevel, Topic};

/// 会话上下文存储
#[derive(Debug)]
pub struct ContextStore {
    sessions: DashMap<String, ConversationContext>,
    max_history: usize,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl ContextStore {
    /// 创建新存储
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_history,
        }
    }

    /// 在分片锁内对指定会话的上下文执行闭包
    ///
    /// 会话不存在时先以配置容量创建。
    pub fn with_session<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&mut ConversationContext) -> R,
    {
        let mut entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationContext::new(self.max_history));
        f(entry.value_mut())
    }

    /// 记录一次成功的问答交互
    pub fn record(&self, session_id: &str, query: &str, response: &str) {
        self.with_session(session_id, |context| {
            context.add_interaction(query, response);
        });
    }

    /// 对提问做主题与难度分类，返回推导结果
    pub fn classify(&self, session_id: &str, query: &str) -> (Option<Topic>, DifficultyLevel) {
        self.with_session(session_id, |context| {
            let topic = context.detect_topic(query);
            context.adjust_difficulty(query);
            (topic, context.difficulty_level)
        })
    }

    /// 指定会话的历史长度
    pub fn interaction_count(&self, session_id: &str) -> usize {
        self.sessions
            .get(session_id)
            .map(|context| context.len())
            .unwrap_or(0)
    }

    /// 当前会话数
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
