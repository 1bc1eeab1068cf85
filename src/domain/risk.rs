// ==========================================
// 作业合规运营洞察系统 - 规程风险画像
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::RiskCategory;

/// 作业规程风险画像
///
/// risk_score 约定在 [0, 100]（公式本身不强制截断）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureRiskProfile {
    pub procedure_id: String,
    pub procedure_name: String,
    pub total_work_orders: f64,
    /// 合规率 (0-100)
    pub compliance_rate: f64,
    /// 事故率 (0-100)
    pub incident_rate: f64,
    /// 平均质量分 (0-10)
    pub avg_quality_score: f64,
    /// 返工占比 (0-1)
    pub rework_ratio: f64,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    /// 处置建议
    pub recommendation: String,
}

/// 设施/人员维度汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group_id: String,
    pub group_name: String,
    pub work_order_count: f64,
    pub compliance_rate: f64,
    pub incident_rate: f64,
    pub avg_quality_score: f64,
    pub total_cost: f64,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
}
