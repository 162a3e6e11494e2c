//! Prompt 构建服务
//!
//! 负责构建故事结构生成所需的系统提示词和用户提示词

use crate::llm::ChatMessage;

/// 系统提示词
const SYSTEM_PROMPT: &str = r#"You are a creative children's science storyteller for SciQuest Heroes.
You write for kids aged 7-9. Your stories must be:
- Kid-friendly, warm and encouraging
- Scientifically accurate at an age-appropriate level
- Free of scary, violent or upsetting content

Always respond with a single valid JSON object and nothing else."#;

/// 期望的输出结构
const STORY_SCHEMA: &str = r#"{
  "title": "A short, catchy story title (max 40 characters)",
  "summary": "A 1-2 sentence summary of the story",
  "topicTag": "The main science topic (e.g. Space, Animals, Weather)",
  "readingLevel": "The target reading level (e.g. Ages 7-9)",
  "estimatedTime": "Estimated reading time (e.g. 5 minutes)"
}"#;

/// Prompt 服务
pub struct PromptService;

impl PromptService {
    /// 创建新的 Prompt 服务
    pub fn new() -> Self {
        Self
    }

    /// 构建用户提示词
    pub fn build_user_prompt(&self, idea: &str) -> String {
        format!(
            "Create a story structure for a science comic based on this idea: \"{}\"\n\n\
             Respond with JSON in exactly this format:\n{}",
            idea, STORY_SCHEMA
        )
    }

    /// 构建故事结构请求的消息列表
    pub fn build_story_messages(&self, idea: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(self.build_user_prompt(idea)),
        ]
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}
