//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。状态在启动后只读，请求之间没有可变共享数据。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::LlmError;
use crate::services::StoryService;

/// 应用共享状态
pub struct AppState {
    /// 故事结构生成服务
    pub story_service: StoryService,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(story_service: StoryService) -> Self {
        Self { story_service }
    }
}

/// 根据配置创建可共享的应用状态
pub fn create_shared_state(config: &AppConfig) -> Result<Arc<AppState>, LlmError> {
    let story_service = StoryService::from_config(config)?;
    Ok(Arc::new(AppState::new(story_service)))
}
