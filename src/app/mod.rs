// ==========================================
// 作业合规运营洞察系统 - 应用层
// ==========================================
// 职责: 状态装配 + HTTP 路由
// ==========================================

pub mod common;
pub mod http;
pub mod state;

// 重导出
pub use common::ErrorResponse;
pub use http::build_router;
pub use state::{get_default_db_path, AppState};
