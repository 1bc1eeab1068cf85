// ==========================================
// 作业合规运营洞察系统 - 规程风险评分
// ==========================================
// 职责: 四项加权指标 → 0-100 风险分 + 风险等级
// 公式: (100 − 合规率)×0.4 + 事故率×0.3 + (10 − 质量分)×5×0.2 + 返工占比×100×0.1
// ==========================================
// 排序: 风险分降序，同分按工单量降序，再按规程ID升序
// ==========================================

use std::cmp::Ordering;

use crate::config::CostConstants;
use crate::domain::aggregate::{GroupAggregate, ProcedureAggregate};
use crate::domain::risk::{GroupSummary, ProcedureRiskProfile};
use crate::domain::types::RiskCategory;
use crate::engine::cost_model::CostModel;

pub const COMPLIANCE_WEIGHT: f64 = 0.4;
pub const INCIDENT_WEIGHT: f64 = 0.3;
pub const QUALITY_WEIGHT: f64 = 0.2;
pub const REWORK_WEIGHT: f64 = 0.1;

/// 风险评分输入
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskInputs {
    /// 合规率 (0-100)
    pub compliance_rate: f64,
    /// 事故率 (0-100)
    pub incident_rate: f64,
    /// 平均质量分 (0-10)
    pub avg_quality_score: f64,
    pub rework_count: f64,
    pub total_work_orders: f64,
}

impl RiskInputs {
    /// 返工占比，工单数为 0 时为 0
    pub fn rework_ratio(&self) -> f64 {
        if self.total_work_orders > 0.0 {
            finite_or_zero(self.rework_count) / self.total_work_orders
        } else {
            0.0
        }
    }
}

// ==========================================
// RiskScorer - 风险评分引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskScorer {}

impl RiskScorer {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算风险分（确定性纯函数）
    pub fn score(&self, inputs: &RiskInputs) -> f64 {
        let compliance_term = (100.0 - finite_or_zero(inputs.compliance_rate)) * COMPLIANCE_WEIGHT;
        let incident_term = finite_or_zero(inputs.incident_rate) * INCIDENT_WEIGHT;
        let quality_term = (10.0 - finite_or_zero(inputs.avg_quality_score)) * 5.0 * QUALITY_WEIGHT;
        let rework_term = inputs.rework_ratio() * 100.0 * REWORK_WEIGHT;

        compliance_term + incident_term + quality_term + rework_term
    }

    /// 单个规程风险画像
    pub fn profile(&self, aggregate: &ProcedureAggregate) -> ProcedureRiskProfile {
        let inputs = RiskInputs {
            compliance_rate: aggregate.compliance_rate(),
            incident_rate: aggregate.incident_rate(),
            avg_quality_score: aggregate.avg_quality_score,
            rework_count: aggregate.rework_count,
            total_work_orders: aggregate.total_work_orders,
        };
        let risk_score = self.score(&inputs);
        let risk_category = RiskCategory::from_score(risk_score);

        tracing::debug!(
            procedure_id = %aggregate.procedure_id,
            risk_score,
            category = %risk_category,
            "规程风险评分"
        );

        ProcedureRiskProfile {
            procedure_id: aggregate.procedure_id.clone(),
            procedure_name: aggregate.procedure_name.clone(),
            total_work_orders: aggregate.total_work_orders,
            compliance_rate: inputs.compliance_rate,
            incident_rate: inputs.incident_rate,
            avg_quality_score: inputs.avg_quality_score,
            rework_ratio: inputs.rework_ratio(),
            risk_score,
            risk_category,
            recommendation: risk_category.recommendation().to_string(),
        }
    }

    /// 风险排行
    pub fn rank(&self, aggregates: &[ProcedureAggregate]) -> Vec<ProcedureRiskProfile> {
        let mut profiles: Vec<ProcedureRiskProfile> =
            aggregates.iter().map(|a| self.profile(a)).collect();
        profiles.sort_by(compare_profiles);
        profiles
    }

    /// 设施/人员维度汇总（风险分口径与规程一致）
    pub fn summarize_group(
        &self,
        group: &GroupAggregate,
        cost_model: &CostModel,
        constants: &CostConstants,
    ) -> GroupSummary {
        let agg = &group.aggregate;
        let inputs = RiskInputs {
            compliance_rate: agg.compliance_rate(),
            incident_rate: agg.incident_rate(),
            avg_quality_score: agg.avg_quality_score,
            rework_count: agg.rework_count,
            total_work_orders: agg.work_order_count,
        };
        let risk_score = self.score(&inputs);

        GroupSummary {
            group_id: group.group_id.clone(),
            group_name: group.group_name.clone(),
            work_order_count: agg.work_order_count,
            compliance_rate: inputs.compliance_rate,
            incident_rate: inputs.incident_rate,
            avg_quality_score: agg.avg_quality_score,
            total_cost: cost_model.compute_breakdown(agg, constants).total,
            risk_score,
            risk_category: RiskCategory::from_score(risk_score),
        }
    }
}

fn compare_profiles(a: &ProcedureRiskProfile, b: &ProcedureRiskProfile) -> Ordering {
    b.risk_score
        .total_cmp(&a.risk_score)
        .then_with(|| b.total_work_orders.total_cmp(&a.total_work_orders))
        .then_with(|| a.procedure_id.cmp(&b.procedure_id))
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
