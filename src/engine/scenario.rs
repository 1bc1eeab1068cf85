// ==========================================
// 作业合规运营洞察系统 - 情景模拟 / ROI 计算
// ==========================================
// 职责: 目标合规率 + 实施投入 → 节约 / ROI / 回本周期 / NPV
// 输入: Scenario + 基线聚合 + 成本常量
// 输出: ScenarioResult（不含 NaN / Infinity）
// ==========================================
// 守卫:
// - 实施投入为 0 → roi = 0
// - 月节约 <= 0 → 回本周期 NotApplicable
// - 节约实现系数与成本模型共用同一常量
// ==========================================

use crate::config::CostConstants;
use crate::domain::aggregate::PeriodAggregate;
use crate::domain::scenario::{PaybackPeriod, Scenario, ScenarioResult};
use crate::engine::cost_model::CostModel;

/// ROI 相关指标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiMetrics {
    pub roi: f64,
    pub payback_months: PaybackPeriod,
    pub npv: f64,
}

/// ROI 百分比
///
/// ((savings − cost) / cost) × 100，cost <= 0 时为 0
pub fn roi_percent(annual_savings: f64, implementation_cost: f64) -> f64 {
    if implementation_cost <= 0.0 || !implementation_cost.is_finite() {
        return 0.0;
    }
    let roi = (annual_savings - implementation_cost) / implementation_cost * 100.0;
    if roi.is_finite() {
        roi
    } else {
        0.0
    }
}

/// 回本周期 ceil(cost / (savings / 12))
pub fn payback_period(annual_savings: f64, implementation_cost: f64) -> PaybackPeriod {
    let monthly_savings = annual_savings / 12.0;
    if !monthly_savings.is_finite() || monthly_savings <= 0.0 {
        return PaybackPeriod::NotApplicable;
    }

    let months = (implementation_cost.max(0.0) / monthly_savings).ceil();
    if months.is_finite() && months <= u32::MAX as f64 {
        PaybackPeriod::Months(months as u32)
    } else {
        PaybackPeriod::NotApplicable
    }
}

/// NPV = −cost + Σ_{year=1..horizon} savings / (1 + rate)^year
pub fn net_present_value(
    annual_savings: f64,
    implementation_cost: f64,
    discount_rate: f64,
    horizon_years: u32,
) -> f64 {
    let discounted: f64 = (1..=horizon_years)
        .map(|year| annual_savings / (1.0 + discount_rate).powi(year as i32))
        .sum();
    -implementation_cost + discounted
}

/// 汇总 ROI 指标
pub fn roi_metrics(
    annual_savings: f64,
    implementation_cost: f64,
    constants: &CostConstants,
) -> RoiMetrics {
    RoiMetrics {
        roi: roi_percent(annual_savings, implementation_cost),
        payback_months: payback_period(annual_savings, implementation_cost),
        npv: net_present_value(
            annual_savings,
            implementation_cost,
            constants.npv_discount_rate,
            constants.npv_horizon_years,
        ),
    }
}

// ==========================================
// ScenarioCalculator - 情景模拟计算器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ScenarioCalculator {
    cost_model: CostModel,
}

impl ScenarioCalculator {
    pub fn new(cost_model: CostModel) -> Self {
        Self { cost_model }
    }

    /// 评估单个情景
    ///
    /// # 参数
    /// - `scenario`: 用户输入（目标合规率、工单量、人工单价、实施投入与周期）
    /// - `baseline`: 当前区间聚合
    /// - `constants`: 成本常量；labor_cost_per_hour > 0 时仅本次调用覆写人工单价
    ///
    /// # 返回
    /// 情景结果；工单量 > 0 且基线非空时按比例缩放基线
    pub fn evaluate(
        &self,
        scenario: &Scenario,
        baseline: &PeriodAggregate,
        constants: &CostConstants,
    ) -> ScenarioResult {
        let constants = constants.with_hourly_rate(scenario.labor_cost_per_hour);

        let aggregate = if scenario.work_order_volume > 0.0 && baseline.work_order_count > 0.0 {
            baseline.scaled(scenario.work_order_volume / baseline.work_order_count)
        } else {
            *baseline
        };

        let current_compliance_rate = aggregate.compliance_rate();
        let current_total_cost = self.cost_model.compute_breakdown(&aggregate, &constants).total;

        let target = if scenario.target_compliance.is_finite() {
            scenario.target_compliance.clamp(0.0, 100.0)
        } else {
            current_compliance_rate
        };
        let compliance_improvement = (target - current_compliance_rate).max(0.0);

        let potential_annual_savings = self.cost_model.potential_savings(
            current_total_cost,
            current_compliance_rate,
            target,
            &constants,
        );
        let implementation_cost = scenario.implementation_cost.max(0.0);
        let metrics = roi_metrics(potential_annual_savings, implementation_cost, &constants);

        let break_even_month = match metrics.payback_months {
            PaybackPeriod::Months(m) => {
                PaybackPeriod::Months(m.saturating_add(scenario.implementation_months))
            }
            PaybackPeriod::NotApplicable => PaybackPeriod::NotApplicable,
        };

        tracing::debug!(
            target_compliance = target,
            current_compliance_rate,
            potential_annual_savings,
            roi = metrics.roi,
            "情景模拟完成"
        );

        ScenarioResult {
            scenario: scenario.clone(),
            current_compliance_rate,
            current_total_cost,
            compliance_improvement,
            potential_annual_savings,
            projected_annual_cost: current_total_cost - potential_annual_savings,
            roi: metrics.roi,
            payback_months: metrics.payback_months,
            npv: metrics.npv,
            break_even_month,
        }
    }
}
