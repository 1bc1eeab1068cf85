// ==========================================
// 作业合规运营洞察系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 HTTP 层调用
// ==========================================

pub mod chat_api;
pub mod dashboard_api;
pub mod error;
pub mod work_order_api;

// 重导出核心类型
pub use chat_api::{ChatAnswer, ChatApi};
pub use dashboard_api::{DashboardApi, DateRange, OverviewResponse, TrendResponse};
pub use error::{ApiError, ApiResult};
pub use work_order_api::WorkOrderApi;
