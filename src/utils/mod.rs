//! 通用工具模块

mod text;

pub use text::{capitalize_first, generate_request_id, mask_api_key, truncate_chars};
