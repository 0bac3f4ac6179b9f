//! 响应生成服务
//!
//! 编排提示词构造、预置响应匹配与模型调用，并将模型输出送入
//! 格式化流水线。预置响应只做数学记号格式化，模型输出额外经过
//! 净化；上游失败在本层兜底，调用方永远拿到文本。

use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{debug, error};

use crate::formatting::{MathNotationFormatter, TextSanitizer};
use crate::model::GenerativeModel;

/// 上游失败时的兜底消息
const FALLBACK_MESSAGE: &str = "I'm sorry, I encountered an error processing your query.";

/// 兜底消息附带的装饰符号
pub const DECORATIVE_SYMBOLS: [&str; 15] = [
    "😊", "🌟", "👍", "🚀", "🤔", "💡", "📚", "🎓", "🧠", "✨", "🌈", "👏", "🤓", "💪", "🌞",
];

/// 预置响应规则：触发词集合到固定响应的映射，任一触发词命中即采用
struct CannedRule {
    triggers: &'static [&'static str],
    response: &'static str,
}

impl CannedRule {
    fn matches(&self, query_lower: &str) -> bool {
        self.triggers
            .iter()
            .any(|trigger| query_lower.contains(trigger))
    }
}

/// 量纲分析固定讲解，命中触发词时不经过模型直接返回
const DIMENSIONAL_ANALYSIS_RESPONSE: &str = "\
😮‍💨 💗 Dimensional Analysis of Viscosity

**Step 1: Define the Physical Quantity**
Viscosity (η) is a measure of a fluid's resistance to flow, defined as the ratio of shear stress to shear rate.

**Symbolic Representation:**
η = τ / γ̇

**Step 2: Dimensional Analysis of Components**
- Shear Stress (τ): Force per unit area
  * Dimensions: [M L T^-2] / [L^2] = [M L^-1 T^-2]
- Shear Rate (γ̇): Velocity gradient
  * Dimensions: [L T^-1] / [L] = [T^-1]

**Step 3: Dimensional Consistency**
Combining the dimensions:
[τ / γ̇] = [M L^-1 T^-2] / [T^-1] = [M L^-1 T^-1]

**Step 4: Physical Interpretation**
The dimensional analysis confirms that viscosity has consistent units:
- Mass per length per time
- Typically expressed in Pascal-seconds (Pa·s)

**Key Insights:**
- Viscosity quantifies a fluid's internal resistance to flow
- Dimensional analysis validates the physical meaning of the quantity
";

const CANNED_RULES: [CannedRule; 1] = [CannedRule {
    triggers: &[
        "dimension",
        "dimensional analysis",
        "viscosity",
        "prove",
        "derivation",
    ],
    response: DIMENSIONAL_ANALYSIS_RESPONSE,
}];

/// 响应生成器
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// 为一条提问生成响应文本
    ///
    /// `history_len` 是该会话当前的交互数，会被嵌入提示词。
    /// 本方法不失败：上游错误转换为兜底消息返回。
    async fn generate(&self, query: &str, history_len: usize) -> String;
}

/// 响应生成器实现
pub struct ResponseGeneratorImpl {
    model: Arc<dyn GenerativeModel>,
    formatter: MathNotationFormatter,
    sanitizer: TextSanitizer,
}

impl ResponseGeneratorImpl {
    /// 创建新的服务实例
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            formatter: MathNotationFormatter::new(),
            sanitizer: TextSanitizer::new(),
        }
    }

    /// 构造包含提问与历史交互数的提示词
    fn build_prompt(query: &str, history_len: usize) -> String {
        format!(
            "Context:\n\
             - Current Query: {query}\n\
             - Conversation History: {history_len} previous interactions\n\
             \n\
             Guidelines:\n\
             1. Provide a clear, comprehensive response\n\
             2. Break down complex topics into digestible steps\n\
             3. Use engaging and accessible language\n\
             4. Include practical examples or real-world applications\n\
             5. Use standard mathematical notation for equations\n\
             \n\
             Query: {query}\n"
        )
    }

    fn random_symbol() -> &'static str {
        DECORATIVE_SYMBOLS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("💡")
    }
}

#[async_trait]
impl ResponseGenerator for ResponseGeneratorImpl {
    async fn generate(&self, query: &str, history_len: usize) -> String {
        let query_lower = query.to_lowercase();

        if let Some(rule) = CANNED_RULES.iter().find(|rule| rule.matches(&query_lower)) {
            debug!("Canned response triggered for query");
            return self.formatter.format(rule.response);
        }

        let prompt = Self::build_prompt(query, history_len);

        match self.model.generate(&prompt).await {
            Ok(text) => {
                let formatted = self.formatter.format(&text);
                self.sanitizer.sanitize(&formatted)
            }
            Err(e) => {
                error!("Response generation error: {}", e);
                format!("{} {}", FALLBACK_MESSAGE, Self::random_symbol())
            }
        }
    }
}

/// 创建响应生成器
pub fn create_response_generator(model: Arc<dyn GenerativeModel>) -> Arc<dyn ResponseGenerator> {
    Arc::new(ResponseGeneratorImpl::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use mockall::mock;
    use mockall::predicate::function;

    mock! {
        Model {}

        #[async_trait]
        impl GenerativeModel for Model {
            async fn generate(&self, prompt: &str) -> Result<String>;
        }
    }

    fn generator_with(model: MockModel) -> ResponseGeneratorImpl {
        ResponseGeneratorImpl::new(Arc::new(model))
    }

    #[tokio::test]
    async fn test_viscosity_query_skips_model() {
        let mut model = MockModel::new();
        model.expect_generate().never();

        let generator = generator_with(model);
        let response = generator
            .generate("tell me about the viscosity of honey", 0)
            .await;

        assert!(response.contains("Dimensional Analysis of Viscosity"));
    }

    #[tokio::test]
    async fn test_canned_response_independent_of_query() {
        let mut model = MockModel::new();
        model.expect_generate().never();
        let generator = generator_with(model);

        let a = generator.generate("viscosity", 0).await;
        let b = generator
            .generate("please prove this completely unrelated statement", 3)
            .await;

        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_canned_response_is_math_formatted_not_sanitized() {
        let mut model = MockModel::new();
        model.expect_generate().never();
        let generator = generator_with(model);

        let response = generator.generate("what is dimensional analysis", 0).await;

        // 数学格式化已执行（出现语义容器），但未做 HTML 转义
        assert!(response.contains(r#"<div class="solution-step">"#));
        assert!(!response.contains("&lt;"));
    }

    #[tokio::test]
    async fn test_model_output_runs_through_full_pipeline() {
        let mut model = MockModel::new();
        model
            .expect_generate()
            .returning(|_| Ok("Step 1: compute $x$\n\ndone".to_string()));

        let generator = generator_with(model);
        let response = generator.generate("how do I solve this", 0).await;

        // 净化是最后一步：格式化插入的标记已被转义
        assert!(response.contains("&lt;div class=&quot;solution-step&quot;&gt;"));
        assert!(!response.contains('<'));
    }

    #[tokio::test]
    async fn test_prompt_embeds_query_and_history_count() {
        let mut model = MockModel::new();
        model
            .expect_generate()
            .with(function(|prompt: &str| {
                prompt.contains("Current Query: what is gravity")
                    && prompt.contains("3 previous interactions")
            }))
            .returning(|_| Ok("answer".to_string()));

        let generator = generator_with(model);
        generator.generate("what is gravity", 3).await;
    }

    #[tokio::test]
    async fn test_model_failure_yields_fallback_with_symbol() {
        let mut model = MockModel::new();
        model
            .expect_generate()
            .returning(|_| Err(AppError::Upstream("boom".to_string())));

        let generator = generator_with(model);
        let response = generator.generate("how do I solve this", 0).await;

        assert!(!response.is_empty());
        assert!(response.starts_with(FALLBACK_MESSAGE));
        assert!(
            DECORATIVE_SYMBOLS
                .iter()
                .any(|symbol| response.ends_with(symbol))
        );
    }
}
