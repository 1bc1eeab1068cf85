// ==========================================
// 作业合规运营洞察系统 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 成本归因 / 风险评分 / 趋势预测 / ROI 模拟
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值对象与类型
pub mod domain;

// 数据仓储层 - 数据访问与聚合 SQL
pub mod repository;

// 引擎层 - 成本/风险/趋势/情景计算
pub mod engine;

// 导入层 - CSV 工单
pub mod importer;

// 配置层 - 成本常量与进程配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 智能问答转发
pub mod chat;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与 HTTP 路由
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ComplianceTrend, CostCategory, CostTrend, GroupDimension, RiskCategory};

// 领域实体
pub use domain::{
    CostBreakdown, MonthlyTrendPoint, PeriodAggregate, ProcedureRiskProfile, Scenario,
    ScenarioResult, WorkOrder,
};

// 引擎
pub use engine::{CostModel, RiskScorer, ScenarioCalculator, TrendProjector};

// 配置
pub use config::CostConstants;

// API
pub use api::{ChatApi, DashboardApi, WorkOrderApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "作业合规运营洞察系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
