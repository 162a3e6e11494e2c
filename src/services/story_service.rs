//! 故事结构生成服务
//!
//! 配置了 API 密钥时调用 Chat Completions 生成结构，否则走纯本地的确定性兜底。
//! 两条路径的输出都经过兜底默认值补齐。

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::llm::{ChatOptions, CompletionBackend, CompletionRequest, LlmClient, LlmError};
use crate::models::{StoryStructure, StoryStructureDraft};
use crate::utils::{capitalize_first, truncate_chars};

use super::PromptService;

/// 标题最大字符数
const MAX_TITLE_CHARS: usize = 40;

/// 错误日志中保留的内容长度
const CONTENT_PREVIEW: usize = 300;

const DEFAULT_TITLE: &str = "My Science Adventure";
const DEFAULT_SUMMARY: &str =
    "A fun, kid-friendly science adventure that explores your idea step by step.";
const DEFAULT_TOPIC_TAG: &str = "Science";
const DEFAULT_READING_LEVEL: &str = "Ages 7-9";
const DEFAULT_ESTIMATED_TIME: &str = "5 minutes";

/// 故事生成错误
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// 上游 API 调用失败
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// 模型返回内容不符合故事结构
    #[error("invalid story structure content: {0}")]
    InvalidContent(String),
}

/// 故事结构生成服务
pub struct StoryService {
    backend: Option<Arc<dyn CompletionBackend>>,
    prompts: PromptService,
    model: String,
    options: ChatOptions,
}

impl StoryService {
    /// 使用指定的补全后端创建服务；`backend` 为 None 时只走兜底路径
    pub fn new(backend: Option<Arc<dyn CompletionBackend>>, config: &AppConfig) -> Self {
        Self {
            backend,
            prompts: PromptService::new(),
            model: config.model.clone(),
            options: ChatOptions {
                temperature: Some(config.temperature),
                max_tokens: Some(config.max_tokens),
                response_format: Some("json_object".to_string()),
            },
        }
    }

    /// 根据配置创建服务
    ///
    /// 未配置 API 密钥是受支持的运行模式，不视为错误
    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        let backend: Option<Arc<dyn CompletionBackend>> = if config.has_api_key() {
            let client = LlmClient::new(
                config.api_key.as_str(),
                config.base_url.as_str(),
                Duration::from_secs(config.timeout_secs),
            )?;
            Some(Arc::new(client))
        } else {
            None
        };
        Ok(Self::new(backend, config))
    }

    /// 当前运行模式
    pub fn mode(&self) -> &'static str {
        if self.backend.is_some() {
            "openai"
        } else {
            "fallback"
        }
    }

    /// 本地兜底结构，纯字符串运算，相同输入得到相同输出
    pub fn fallback_structure(idea: &str) -> StoryStructure {
        let idea = idea.trim();
        let title = if idea.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            truncate_chars(&capitalize_first(idea), MAX_TITLE_CHARS)
        };

        StoryStructure {
            title,
            summary: DEFAULT_SUMMARY.to_string(),
            topic_tag: DEFAULT_TOPIC_TAG.to_string(),
            reading_level: DEFAULT_READING_LEVEL.to_string(),
            estimated_time: DEFAULT_ESTIMATED_TIME.to_string(),
        }
    }

    /// 生成故事结构
    ///
    /// 调用方负责校验 `idea` 非空
    pub async fn generate(&self, idea: &str) -> Result<StoryStructure, StoryError> {
        let fallback = Self::fallback_structure(idea);

        let Some(backend) = self.backend.as_ref() else {
            warn!("OPENAI_API_KEY not configured, using fallback story structure");
            return Ok(fallback);
        };

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: self.prompts.build_story_messages(idea),
            options: self.options.clone(),
        };

        let content = backend.complete(request).await.map_err(|e| {
            error!("Story structure request failed: {}", e);
            StoryError::from(e)
        })?;

        let draft = decode_story_content(&content).map_err(|e| {
            error!(
                "Failed to decode story structure: {}, content={}",
                e,
                truncate_chars(&content, CONTENT_PREVIEW)
            );
            e
        })?;

        let story = draft.fill_from(fallback);
        info!("Story structure generated: title={:?}", story.title);
        Ok(story)
    }
}

/// 去掉 Markdown 代码块包裹（```json ... ```）
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 跳过语言标记，单行代码块（```json{...}```）同样适用
    let body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    body.trim().trim_end_matches("```").trim()
}

/// 将模型返回的内容解码为故事结构草稿
fn decode_story_content(content: &str) -> Result<StoryStructureDraft, StoryError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| StoryError::InvalidContent(e.to_string()))?;

    if !value.is_object() {
        return Err(StoryError::InvalidContent(
            "expected a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| StoryError::InvalidContent(e.to_string()))
}
