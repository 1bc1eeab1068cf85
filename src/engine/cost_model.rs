// ==========================================
// 作业合规运营洞察系统 - 成本归因模型
// ==========================================
// 职责: PeriodAggregate → CostBreakdown（人工/物料/安全/停机/质量）
// 输入: 聚合记录 + 成本常量
// 输出: 未取整的美元金额（取整留给展示层）
// ==========================================
// 红线: 纯函数，无 I/O，无共享可变状态
// ==========================================

use crate::config::CostConstants;
use crate::domain::aggregate::PeriodAggregate;
use crate::domain::cost::{CategoryShare, CostBreakdown, ProfitBreakdown};
use crate::domain::types::CostCategory;

// ==========================================
// CostModel - 成本归因模型
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct CostModel {
    // 无状态引擎，常量由调用方逐次传入
}

impl CostModel {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算成本分解
    ///
    /// - labor    = rework × AVG_REWORK_HOURS × HOURLY_RATE + max(0, variance) × HOURLY_RATE
    /// - material = incidents × EQUIPMENT_DAMAGE_AVG + rework × MATERIAL_WASTE_AVG
    /// - safety   = incidents × INCIDENT_DIRECT_COST × OSHA_MULTIPLIER
    /// - downtime = downtime_hours × PRODUCTION_LOSS_PER_HOUR
    /// - quality  = max(0, 10 − avg_quality) × work_orders × QUALITY_CUSTOMER_IMPACT
    ///
    /// 无工单时所有类别为 0。
    pub fn compute_breakdown(
        &self,
        aggregate: &PeriodAggregate,
        constants: &CostConstants,
    ) -> CostBreakdown {
        if aggregate.work_order_count <= 0.0 {
            return CostBreakdown::zero();
        }

        let labor = aggregate.rework_count * constants.avg_rework_hours * constants.hourly_rate
            + aggregate.duration_variance_hours.max(0.0) * constants.hourly_rate;

        let material = aggregate.incident_count * constants.equipment_damage_avg
            + aggregate.rework_count * constants.material_waste_avg;

        let safety =
            aggregate.incident_count * constants.incident_direct_cost * constants.osha_multiplier;

        let downtime = aggregate.downtime_hours * constants.production_loss_per_hour;

        let quality_loss = (10.0 - aggregate.avg_quality_score).max(0.0);
        let quality =
            quality_loss * aggregate.work_order_count * constants.quality_customer_impact;

        let breakdown = CostBreakdown::new(labor, material, safety, downtime, quality);

        tracing::trace!(
            work_orders = aggregate.work_order_count,
            total = breakdown.total,
            "成本分解完成"
        );

        breakdown
    }

    /// 类别占比（固定顺序：人工/物料/安全/停机/质量）
    ///
    /// 总额为 0 时各占比为 0
    pub fn category_shares(&self, breakdown: &CostBreakdown) -> Vec<CategoryShare> {
        CostCategory::ALL
            .iter()
            .map(|&category| {
                let amount = breakdown.amount(category);
                let percent_of_total = if breakdown.total > 0.0 {
                    amount / breakdown.total * 100.0
                } else {
                    0.0
                };
                CategoryShare {
                    category,
                    total: amount,
                    percent_of_total,
                }
            })
            .collect()
    }

    /// 潜在节约
    ///
    /// total × max(0, (target − current) / 100) × SAVINGS_REALIZATION_FACTOR
    pub fn potential_savings(
        &self,
        total_cost: f64,
        current_compliance_rate: f64,
        target_compliance_rate: f64,
        constants: &CostConstants,
    ) -> f64 {
        let gap = ((target_compliance_rate - current_compliance_rate) / 100.0).max(0.0);
        let savings = total_cost.max(0.0) * gap * constants.savings_realization_factor;
        if savings.is_finite() {
            savings
        } else {
            0.0
        }
    }

    /// 利润侵蚀分析
    pub fn profit_breakdown(
        &self,
        aggregate: &PeriodAggregate,
        target_compliance_rate: f64,
        constants: &CostConstants,
    ) -> ProfitBreakdown {
        let breakdown = self.compute_breakdown(aggregate, constants);
        let current_compliance_rate = aggregate.compliance_rate();
        let potential_savings = self.potential_savings(
            breakdown.total,
            current_compliance_rate,
            target_compliance_rate,
            constants,
        );

        ProfitBreakdown {
            categories: self.category_shares(&breakdown),
            breakdown,
            current_compliance_rate,
            target_compliance_rate,
            potential_savings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregate::PeriodAggregateRow;

    fn sample_aggregate() -> PeriodAggregate {
        PeriodAggregateRow {
            work_order_count: Some(588.0),
            compliant_count: Some(521.0),
            incident_count: Some(12.0),
            rework_count: Some(34.0),
            downtime_hours: Some(48.5),
            avg_quality_score: Some(7.8),
            total_duration_hours: None,
            duration_variance_hours: None,
        }
        .normalize(7.0)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_breakdown_standard_constants() {
        let model = CostModel::new();
        let c = CostConstants::default();
        let b = model.compute_breakdown(&sample_aggregate(), &c);

        assert!(approx(b.labor, 34.0 * 4.0 * 45.0));
        assert!(approx(b.material, 12.0 * 5_000.0 + 34.0 * 350.0));
        assert!(approx(b.safety, 12.0 * 12_000.0 * 1.5));
        assert!(approx(b.downtime, 48.5 * 2_500.0));
        assert!(approx(b.quality, (10.0 - 7.8) * 588.0 * 150.0));
        assert!(approx(b.total, 609_310.0));
    }

    #[test]
    fn test_total_equals_sum_of_categories() {
        let model = CostModel::new();
        let b = model.compute_breakdown(&sample_aggregate(), &CostConstants::default());
        assert_eq!(b.labor + b.material + b.safety + b.downtime + b.quality, b.total);
    }

    #[test]
    fn test_zero_work_orders_yields_zero_costs() {
        let model = CostModel::new();
        let agg = PeriodAggregateRow {
            work_order_count: Some(0.0),
            rework_count: Some(5.0),
            incident_count: Some(2.0),
            downtime_hours: Some(10.0),
            ..Default::default()
        }
        .normalize(7.0);

        let b = model.compute_breakdown(&agg, &CostConstants::default());
        assert_eq!(b, CostBreakdown::zero());
        assert_eq!(b.total, 0.0);
    }

    #[test]
    fn test_duration_variance_adds_labor() {
        let model = CostModel::new();
        let mut agg = sample_aggregate();
        agg.rework_count = 0.0;
        agg.duration_variance_hours = 10.0;

        let b = model.compute_breakdown(&agg, &CostConstants::default());
        assert!(approx(b.labor, 450.0));
    }

    #[test]
    fn test_quality_above_ten_costs_nothing() {
        let model = CostModel::new();
        let mut agg = sample_aggregate();
        agg.avg_quality_score = 10.0;
        let b = model.compute_breakdown(&agg, &CostConstants::default());
        assert_eq!(b.quality, 0.0);
    }

    #[test]
    fn test_category_shares_sum_to_100() {
        let model = CostModel::new();
        let b = model.compute_breakdown(&sample_aggregate(), &CostConstants::default());
        let shares = model.category_shares(&b);

        assert_eq!(shares.len(), 5);
        assert_eq!(shares[0].category, CostCategory::Labor);
        let sum: f64 = shares.iter().map(|s| s.percent_of_total).sum();
        assert!((sum - 100.0).abs() <= 0.1, "占比之和应为100%，实际 {}", sum);
    }

    #[test]
    fn test_category_shares_zero_total() {
        let model = CostModel::new();
        let shares = model.category_shares(&CostBreakdown::zero());
        assert!(shares.iter().all(|s| s.percent_of_total == 0.0));
    }

    #[test]
    fn test_potential_savings() {
        let model = CostModel::new();
        let c = CostConstants::default();

        // 100_000 × 10% × 0.7
        assert!(approx(model.potential_savings(100_000.0, 85.0, 95.0, &c), 7_000.0));
        // 已超过目标不产生节约
        assert_eq!(model.potential_savings(100_000.0, 97.0, 95.0, &c), 0.0);
    }

    #[test]
    fn test_profit_breakdown_uses_current_rate() {
        let model = CostModel::new();
        let c = CostConstants::default();
        let agg = sample_aggregate();
        let p = model.profit_breakdown(&agg, 95.0, &c);

        assert!(approx(p.current_compliance_rate, 521.0 / 588.0 * 100.0));
        let expected = p.breakdown.total * ((95.0 - p.current_compliance_rate) / 100.0) * 0.7;
        assert!(approx(p.potential_savings, expected));
    }
}
