// ==========================================
// 作业合规运营洞察系统 - 趋势预测引擎
// ==========================================
// 职责: 月度序列最小二乘线性拟合 + N 月外推 + 逐月放宽的置信区间
// 输入: 月度聚合（升序）+ 成本常量
// 输出: 历史点 + 预测点 + 趋势标签
// ==========================================
// 约束:
// - n = 0 或分母为 0 时 slope/intercept 均为 0（不得产生 NaN/Infinity）
// - 合规率预测截断到 [0, 100]
// - 事故数预测 >= 0 且取整
// - 成本趋势阈值 ±5%，合规趋势阈值 ±2%（策略值）
// ==========================================

use chrono::{Months, NaiveDate};

use crate::config::CostConstants;
use crate::domain::aggregate::MonthlyAggregate;
use crate::domain::trend::{MonthlyTrendPoint, RegressionLine, TrendProjection};
use crate::domain::types::{ComplianceTrend, CostTrend};
use crate::engine::cost_model::CostModel;

/// 趋势对比窗口（月）
pub const TREND_WINDOW_MONTHS: usize = 3;
pub const COST_TREND_TOLERANCE: f64 = 0.05;
pub const COMPLIANCE_TREND_TOLERANCE: f64 = 0.02;

/// 最小二乘线性回归
///
/// slope = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)，intercept = (Σy − slope·Σx) / n
///
/// # 示例
/// ```
/// use ops_intel::engine::trend_projector::linear_regression;
///
/// let line = linear_regression(&[(0.0, 100.0), (1.0, 200.0)]);
/// assert_eq!(line.slope, 100.0);
/// assert_eq!(line.intercept, 100.0);
///
/// // 单点退化：不得直接返回 y
/// let degenerate = linear_regression(&[(0.0, 100.0)]);
/// assert_eq!(degenerate.slope, 0.0);
/// assert_eq!(degenerate.intercept, 0.0);
/// ```
pub fn linear_regression(points: &[(f64, f64)]) -> RegressionLine {
    let zero = RegressionLine {
        slope: 0.0,
        intercept: 0.0,
    };

    let n = points.len() as f64;
    if points.is_empty() {
        return zero;
    }

    let (sum_x, sum_y, sum_xy, sum_xx) = points.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sxx), &(x, y)| (sx + x, sy + y, sxy + x * y, sxx + x * x),
    );

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return zero;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    if slope.is_finite() && intercept.is_finite() {
        RegressionLine { slope, intercept }
    } else {
        zero
    }
}

/// 总体标准差（除以 n，不做样本修正）
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// 第 i 个预测月的置信半宽: std_dev × (1 + i × widening)
pub fn confidence_range(std_dev: f64, month_offset: u32, widening_per_month: f64) -> f64 {
    std_dev * (1.0 + month_offset as f64 * widening_per_month)
}

/// 近窗口均值 vs 前窗口均值
///
/// 返回 None: 任一窗口为空（无法比较）。前窗口均值为 0 时照常比较
fn window_means(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    let recent_len = n.min(TREND_WINDOW_MONTHS);
    let recent = &values[n - recent_len..];
    let older_end = n - recent_len;
    let older_start = older_end.saturating_sub(TREND_WINDOW_MONTHS);
    let older = &values[older_start..older_end];

    if recent.is_empty() || older.is_empty() {
        return None;
    }

    let recent_mean = recent.iter().sum::<f64>() / recent.len() as f64;
    let older_mean = older.iter().sum::<f64>() / older.len() as f64;
    Some((recent_mean, older_mean))
}

/// 成本趋势分类
pub fn classify_cost_trend(monthly_costs: &[f64]) -> CostTrend {
    match window_means(monthly_costs) {
        Some((recent, older)) if recent > older * (1.0 + COST_TREND_TOLERANCE) => {
            CostTrend::Increasing
        }
        Some((recent, older)) if recent < older * (1.0 - COST_TREND_TOLERANCE) => {
            CostTrend::Decreasing
        }
        _ => CostTrend::Stable,
    }
}

/// 合规趋势分类
pub fn classify_compliance_trend(monthly_rates: &[f64]) -> ComplianceTrend {
    match window_means(monthly_rates) {
        Some((recent, older)) if recent > older * (1.0 + COMPLIANCE_TREND_TOLERANCE) => {
            ComplianceTrend::Improving
        }
        Some((recent, older)) if recent < older * (1.0 - COMPLIANCE_TREND_TOLERANCE) => {
            ComplianceTrend::Declining
        }
        _ => ComplianceTrend::Stable,
    }
}

/// 月份标签向后推移（YYYY-MM）
fn shift_month(month: &str, offset: u32) -> String {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.checked_add_months(Months::new(offset)))
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_else(|| format!("{}+{}", month, offset))
}

// ==========================================
// TrendProjector - 趋势预测引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendProjector {
    cost_model: CostModel,
}

impl TrendProjector {
    pub fn new(cost_model: CostModel) -> Self {
        Self { cost_model }
    }

    /// 生成历史 + 预测序列
    ///
    /// # 参数
    /// - `history`: 月度聚合（按月份升序）
    /// - `months_ahead`: 预测月数
    /// - `constants`: 成本常量（成本计算与置信区间放宽比例）
    ///
    /// 历史为空时不做外推，返回空序列与零回归线
    pub fn project(
        &self,
        history: &[MonthlyAggregate],
        months_ahead: u32,
        constants: &CostConstants,
    ) -> TrendProjection {
        let mut points: Vec<MonthlyTrendPoint> = history
            .iter()
            .map(|m| MonthlyTrendPoint {
                month: m.month.clone(),
                total_cost: self.cost_model.compute_breakdown(&m.aggregate, constants).total,
                compliance_rate: m.aggregate.compliance_rate(),
                incident_count: m.aggregate.incident_count,
                is_projection: false,
                confidence_min: None,
                confidence_max: None,
            })
            .collect();

        let costs: Vec<f64> = points.iter().map(|p| p.total_cost).collect();
        let rates: Vec<f64> = points.iter().map(|p| p.compliance_rate).collect();
        let incidents: Vec<f64> = points.iter().map(|p| p.incident_count).collect();

        let cost_line = linear_regression(&indexed(&costs));
        let compliance_line = linear_regression(&indexed(&rates));
        let incident_line = linear_regression(&indexed(&incidents));
        let cost_std_dev = population_std_dev(&costs);

        if let Some(last) = history.last() {
            let last_index = (history.len() - 1) as f64;

            for i in 1..=months_ahead {
                let x = last_index + i as f64;
                let projected_cost = cost_line.at(x);
                let range =
                    confidence_range(cost_std_dev, i, constants.confidence_widening_per_month);

                points.push(MonthlyTrendPoint {
                    month: shift_month(&last.month, i),
                    total_cost: projected_cost,
                    compliance_rate: compliance_line.at(x).clamp(0.0, 100.0),
                    incident_count: incident_line.at(x).max(0.0).round(),
                    is_projection: true,
                    confidence_min: Some((projected_cost - range).max(0.0)),
                    confidence_max: Some(projected_cost + range),
                });
            }
        }

        let projection = TrendProjection {
            cost_trend: classify_cost_trend(&costs),
            compliance_trend: classify_compliance_trend(&rates),
            points,
            cost_line,
            compliance_line,
            incident_line,
            cost_std_dev,
        };

        tracing::debug!(
            history_months = history.len(),
            months_ahead,
            cost_slope = cost_line.slope,
            cost_trend = %projection.cost_trend,
            "趋势预测完成"
        );

        projection
    }
}

/// 序列 → (月序号, 值)
fn indexed(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregate::PeriodAggregateRow;

    fn month(label: &str, work_orders: f64, compliant: f64, incidents: f64, rework: f64) -> MonthlyAggregate {
        MonthlyAggregate {
            month: label.to_string(),
            aggregate: PeriodAggregateRow {
                work_order_count: Some(work_orders),
                compliant_count: Some(compliant),
                incident_count: Some(incidents),
                rework_count: Some(rework),
                avg_quality_score: Some(10.0),
                ..Default::default()
            }
            .normalize(7.0),
        }
    }

    #[test]
    fn test_regression_empty_input() {
        let line = linear_regression(&[]);
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 0.0);
    }

    #[test]
    fn test_regression_single_point_guard() {
        let line = linear_regression(&[(0.0, 100.0)]);
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 0.0);
    }

    #[test]
    fn test_regression_two_points() {
        let line = linear_regression(&[(0.0, 100.0), (1.0, 200.0)]);
        assert_eq!(line.slope, 100.0);
        assert_eq!(line.intercept, 100.0);
        assert_eq!(line.at(2.0), 300.0);
    }

    #[test]
    fn test_regression_flat_series() {
        let line = linear_regression(&[(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)]);
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 5.0);
    }

    #[test]
    fn test_population_std_dev() {
        // 均值 5，平方差之和 32，n=8
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(population_std_dev(&values), 2.0);
        assert_eq!(population_std_dev(&[]), 0.0);
    }

    #[test]
    fn test_confidence_range_widens() {
        let s = 1000.0;
        assert!((confidence_range(s, 1, 0.15) - 1150.0).abs() < 1e-9);
        assert!((confidence_range(s, 2, 0.15) - 1300.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_trend_classification() {
        assert_eq!(
            classify_cost_trend(&[100.0, 100.0, 100.0, 110.0, 110.0, 110.0]),
            CostTrend::Increasing
        );
        assert_eq!(
            classify_cost_trend(&[100.0, 100.0, 100.0, 90.0, 90.0, 90.0]),
            CostTrend::Decreasing
        );
        assert_eq!(
            classify_cost_trend(&[100.0, 100.0, 100.0, 104.0, 104.0, 104.0]),
            CostTrend::Stable
        );
        // 不足 6 个月：前窗口只取剩余月份
        assert_eq!(
            classify_cost_trend(&[100.0, 200.0, 300.0, 400.0]),
            CostTrend::Increasing
        );
        // 前窗口为空
        assert_eq!(classify_cost_trend(&[100.0, 500.0]), CostTrend::Stable);
        assert_eq!(classify_cost_trend(&[100.0]), CostTrend::Stable);
        assert_eq!(classify_cost_trend(&[]), CostTrend::Stable);
    }

    #[test]
    fn test_compliance_trend_classification() {
        assert_eq!(
            classify_compliance_trend(&[80.0, 80.0, 80.0, 83.0, 83.0, 83.0]),
            ComplianceTrend::Improving
        );
        assert_eq!(
            classify_compliance_trend(&[80.0, 80.0, 80.0, 78.0, 78.0, 78.0]),
            ComplianceTrend::Declining
        );
        assert_eq!(
            classify_compliance_trend(&[80.0, 80.0, 80.0, 81.0, 81.0, 81.0]),
            ComplianceTrend::Stable
        );
    }

    #[test]
    fn test_trend_from_zero_baseline() {
        assert_eq!(
            classify_cost_trend(&[0.0, 0.0, 0.0, 50_000.0, 50_000.0, 50_000.0]),
            CostTrend::Increasing
        );
        assert_eq!(
            classify_compliance_trend(&[0.0, 0.0, 0.0, 50.0, 50.0, 50.0]),
            ComplianceTrend::Improving
        );
        // 两个窗口都为 0
        assert_eq!(
            classify_cost_trend(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            CostTrend::Stable
        );
        assert_eq!(
            classify_compliance_trend(&[0.0, 0.0, 0.0, 0.0]),
            ComplianceTrend::Stable
        );
    }

    #[test]
    fn test_shift_month_crosses_year() {
        assert_eq!(shift_month("2026-11", 1), "2026-12");
        assert_eq!(shift_month("2026-11", 3), "2027-02");
    }

    #[test]
    fn test_project_empty_history() {
        let projector = TrendProjector::new(CostModel::new());
        let p = projector.project(&[], 6, &CostConstants::default());
        assert!(p.points.is_empty());
        assert_eq!(p.cost_trend, CostTrend::Stable);
    }

    #[test]
    fn test_project_appends_projection_points() {
        let projector = TrendProjector::new(CostModel::new());
        let constants = CostConstants::default();
        let history = vec![
            month("2026-01", 100.0, 80.0, 1.0, 2.0),
            month("2026-02", 100.0, 85.0, 2.0, 4.0),
            month("2026-03", 100.0, 90.0, 3.0, 6.0),
        ];

        let p = projector.project(&history, 2, &constants);

        assert_eq!(p.points.len(), 5);
        assert_eq!(p.historical().count(), 3);
        assert_eq!(p.projected().count(), 2);

        let first = &p.points[3];
        assert_eq!(first.month, "2026-04");
        assert!(first.is_projection);
        assert!((first.compliance_rate - 95.0).abs() < 1e-9);
        assert_eq!(first.incident_count, 4.0);

        let range = confidence_range(p.cost_std_dev, 1, constants.confidence_widening_per_month);
        let max = first.confidence_max.unwrap();
        assert!((max - (first.total_cost + range)).abs() < 1e-6);
        assert!(first.confidence_min.unwrap() >= 0.0);

        let second = &p.points[4];
        assert_eq!(second.month, "2026-05");
        assert!((second.compliance_rate - 100.0).abs() < 1e-9);
        // 置信区间逐月放宽
        let w1 = first.confidence_max.unwrap() - first.total_cost;
        let w2 = second.confidence_max.unwrap() - second.total_cost;
        assert!(w2 > w1);
    }

    #[test]
    fn test_project_clamps_compliance_and_incidents() {
        let projector = TrendProjector::new(CostModel::new());
        let history = vec![
            month("2026-01", 100.0, 90.0, 6.0, 0.0),
            month("2026-02", 100.0, 95.0, 3.0, 0.0),
            month("2026-03", 100.0, 100.0, 0.0, 0.0),
        ];

        let p = projector.project(&history, 3, &CostConstants::default());
        for point in p.projected() {
            assert!(point.compliance_rate <= 100.0);
            assert!(point.incident_count >= 0.0);
            assert_eq!(point.incident_count.fract(), 0.0);
        }
    }

    #[test]
    fn test_project_single_month_uses_degenerate_guard() {
        let projector = TrendProjector::new(CostModel::new());
        let history = vec![month("2026-01", 100.0, 90.0, 1.0, 2.0)];

        let p = projector.project(&history, 1, &CostConstants::default());
        assert_eq!(p.cost_line.slope, 0.0);
        assert_eq!(p.cost_line.intercept, 0.0);
        assert_eq!(p.cost_std_dev, 0.0);
        assert_eq!(p.points[1].total_cost, 0.0);
    }
}
