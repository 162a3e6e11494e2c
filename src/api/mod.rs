//! API 路由模块

mod cors;
mod health;
mod story;

pub use cors::cors_headers;
pub use health::health_routes;
pub use story::story_routes;

use axum::Router;

use crate::state::AppState;
use std::sync::Arc;

/// 创建所有 API 路由
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(story_routes())
        .with_state(state)
}
