// ==========================================
// 作业合规运营洞察系统 - 引擎层
// ==========================================
// 职责: 成本归因 / 风险评分 / 趋势预测 / 情景模拟
// 红线: Engine 不拼 SQL，不做 I/O，不持有共享可变状态
// ==========================================
// 数据流: 聚合层 → CostModel → {RiskScorer, TrendProjector, ScenarioCalculator}
// ==========================================

pub mod cost_model;
pub mod risk_scorer;
pub mod scenario;
pub mod trend_projector;

// 重导出核心引擎
pub use cost_model::CostModel;
pub use risk_scorer::{RiskInputs, RiskScorer};
pub use scenario::{roi_metrics, RoiMetrics, ScenarioCalculator};
pub use trend_projector::{linear_regression, population_std_dev, TrendProjector};
