// ==========================================
// 作业合规运营洞察系统 - 看板上下文摘要
// ==========================================
// 职责: 把当前区间的汇总结果压缩成一段可序列化摘要，作为 LLM 的 system 上下文
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::aggregate::PeriodAggregate;
use crate::domain::cost::ProfitBreakdown;
use crate::domain::risk::ProcedureRiskProfile;
use crate::domain::trend::{MonthlyTrendPoint, TrendProjection};
use crate::domain::types::{ComplianceTrend, CostTrend, RiskCategory};

/// 摘要中保留的高风险规程数量
pub const TOP_RISK_LIMIT: usize = 5;

/// 高风险规程摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDigest {
    pub procedure_id: String,
    pub procedure_name: String,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub compliance_rate: f64,
}

/// 看板上下文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardContext {
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
    pub work_order_count: f64,
    pub compliance_rate: f64,
    pub incident_count: f64,
    pub total_cost: f64,
    pub potential_savings: f64,
    pub top_risks: Vec<RiskDigest>,
    pub cost_trend: CostTrend,
    pub compliance_trend: ComplianceTrend,
    /// 下一个预测月（无历史时为空）
    pub next_projection: Option<MonthlyTrendPoint>,
}

impl DashboardContext {
    /// 组装上下文
    ///
    /// ranked 需已按风险降序排列
    pub fn build(
        period_from: NaiveDate,
        period_to: NaiveDate,
        aggregate: &PeriodAggregate,
        profit: &ProfitBreakdown,
        ranked: &[ProcedureRiskProfile],
        projection: &TrendProjection,
    ) -> Self {
        Self {
            period_from,
            period_to,
            work_order_count: aggregate.work_order_count,
            compliance_rate: aggregate.compliance_rate(),
            incident_count: aggregate.incident_count,
            total_cost: profit.breakdown.total,
            potential_savings: profit.potential_savings,
            top_risks: ranked
                .iter()
                .take(TOP_RISK_LIMIT)
                .map(|p| RiskDigest {
                    procedure_id: p.procedure_id.clone(),
                    procedure_name: p.procedure_name.clone(),
                    risk_score: round2(p.risk_score),
                    risk_category: p.risk_category,
                    compliance_rate: round2(p.compliance_rate),
                })
                .collect(),
            cost_trend: projection.cost_trend,
            compliance_trend: projection.compliance_trend,
            next_projection: projection.projected().next().cloned(),
        }
    }

    /// 渲染为 system 提示文本（说明 + JSON 摘要）
    pub fn to_system_prompt(&self) -> String {
        let digest = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        format!(
            "You are an operations analyst for field work-order compliance. \
             Answer using only the dashboard data below. Currency values are US dollars.\n\n{}",
            digest
        )
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
