// ==========================================
// 作业合规运营洞察系统 - 领域模型层
// ==========================================
// 职责: 定义聚合记录、计算结果、类型枚举
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod aggregate;
pub mod cost;
pub mod risk;
pub mod scenario;
pub mod trend;
pub mod types;
pub mod work_order;

// 重导出核心类型
pub use aggregate::{
    GroupAggregate, MonthlyAggregate, PeriodAggregate, PeriodAggregateRow, ProcedureAggregate,
};
pub use cost::{CategoryShare, CostBreakdown, ProfitBreakdown};
pub use risk::{GroupSummary, ProcedureRiskProfile};
pub use scenario::{PaybackPeriod, Scenario, ScenarioResult};
pub use trend::{MonthlyTrendPoint, RegressionLine, TrendProjection};
pub use types::{ComplianceTrend, CostCategory, CostTrend, GroupDimension, RiskCategory};
pub use work_order::{WorkOrder, WorkOrderFilter};
