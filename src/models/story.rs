//! 故事结构请求/响应模型

use serde::{Deserialize, Serialize};

/// 故事创意请求
#[derive(Debug, Default, Deserialize)]
pub struct StoryIdeaRequest {
    #[serde(default)]
    pub idea: Option<String>,
}

impl StoryIdeaRequest {
    /// 去除首尾空白后的创意文本
    pub fn normalized_idea(&self) -> &str {
        self.idea.as_deref().unwrap_or_default().trim()
    }
}

/// 故事结构（唯一的成功响应形状）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryStructure {
    pub title: String,
    pub summary: String,
    pub topic_tag: String,
    pub reading_level: String,
    pub estimated_time: String,
}

/// 模型返回内容的解码目标
///
/// 所有字段可缺省，未知字段忽略；类型不符（如数字）视为解码失败。
/// 顶层必须是 JSON 对象，由 `StoryService` 在解码前检查。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryStructureDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub topic_tag: Option<String>,
    #[serde(default)]
    pub reading_level: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
}

impl StoryStructureDraft {
    /// 用兜底结构补齐缺失、null 或空字符串字段（纯空白字符串保留）
    pub fn fill_from(self, fallback: StoryStructure) -> StoryStructure {
        fn pick(value: Option<String>, default: String) -> String {
            match value {
                Some(v) if !v.is_empty() => v,
                _ => default,
            }
        }

        StoryStructure {
            title: pick(self.title, fallback.title),
            summary: pick(self.summary, fallback.summary),
            topic_tag: pick(self.topic_tag, fallback.topic_tag),
            reading_level: pick(self.reading_level, fallback.reading_level),
            estimated_time: pick(self.estimated_time, fallback.estimated_time),
        }
    }
}

/// 错误响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
