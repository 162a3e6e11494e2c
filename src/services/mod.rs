//! 服务层模块

mod prompt_service;
mod story_service;

pub use prompt_service::PromptService;
pub use story_service::{StoryError, StoryService};
