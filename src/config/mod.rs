// ==========================================
// 作业合规运营洞察系统 - 配置层
// ==========================================
// 职责: 成本常量（config_kv 覆写）+ 进程级环境变量配置
// ==========================================

pub mod config_manager;
pub mod cost_constants;
pub mod server_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager, GLOBAL_SCOPE};
pub use cost_constants::{CostConstants, MAX_NPV_HORIZON_YEARS, MAX_PROJECTION_MONTHS};
pub use server_config::{LlmConfig, ServerConfig};
