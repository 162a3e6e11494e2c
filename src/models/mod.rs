//! 数据模型模块

mod story;

pub use story::{ErrorBody, StoryIdeaRequest, StoryStructure, StoryStructureDraft};
