// ==========================================
// 作业合规运营洞察系统 - 驾驶舱 API
// ==========================================
// 职责: 聚合层 → 引擎 → 展示结果
// 架构: API 层 → AggregateRepository (SQL) + Engine (纯函数)
// ==========================================
// 约定: 每次调用重新加载成本常量，配置修改即时生效
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::chat::DashboardContext;
use crate::config::{ConfigManager, CostConstants, MAX_PROJECTION_MONTHS};
use crate::domain::aggregate::PeriodAggregate;
use crate::domain::cost::ProfitBreakdown;
use crate::domain::risk::{GroupSummary, ProcedureRiskProfile};
use crate::domain::scenario::{Scenario, ScenarioResult};
use crate::domain::trend::TrendProjection;
use crate::domain::types::{GroupDimension, RiskCategory};
use crate::engine::{CostModel, RiskScorer, ScenarioCalculator, TrendProjector};
use crate::i18n;
use crate::repository::AggregateRepository;

/// 默认目标合规率（%）
pub const DEFAULT_TARGET_COMPLIANCE: f64 = 95.0;
/// 默认统计窗口（天）
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;
/// 问答上下文只取下一个月的预测
const CONTEXT_PROJECTION_MONTHS: u32 = 1;

// ==========================================
// DateRange - 查询区间
// ==========================================

/// 闭区间 [from, to]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// 解析区间：to 缺省为 today，from 缺省为 to − 365 天
    ///
    /// # 返回
    /// - Err(InvalidInput): from 晚于 to
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> ApiResult<Self> {
        let to = to.unwrap_or(today);
        let from = from.unwrap_or(to - Duration::days(DEFAULT_LOOKBACK_DAYS));
        if from > to {
            return Err(ApiError::InvalidInput(format!(
                "起始日期{}晚于结束日期{}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }
}

// ==========================================
// 响应 DTO
// ==========================================

/// 总览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub range: DateRange,
    pub aggregate: PeriodAggregate,
    pub compliance_rate: f64,
    pub incident_rate: f64,
    pub profit: ProfitBreakdown,
    /// 风险等级为 HIGH / CRITICAL 的规程数
    pub high_risk_procedures: usize,
}

/// 趋势（附本地化标签）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResponse {
    #[serde(flatten)]
    pub projection: TrendProjection,
    pub cost_trend_label: String,
    pub compliance_trend_label: String,
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    conn: Arc<Mutex<Connection>>,
    config_manager: Arc<ConfigManager>,
    cost_model: CostModel,
    risk_scorer: RiskScorer,
    trend_projector: TrendProjector,
    scenario_calculator: ScenarioCalculator,
}

impl DashboardApi {
    /// 创建新的 DashboardApi 实例
    ///
    /// # 参数
    /// - conn: 共享数据库连接
    /// - config_manager: 成本常量来源
    pub fn new(conn: Arc<Mutex<Connection>>, config_manager: Arc<ConfigManager>) -> Self {
        let cost_model = CostModel::new();
        Self {
            conn,
            config_manager,
            cost_model,
            risk_scorer: RiskScorer::new(),
            trend_projector: TrendProjector::new(cost_model),
            scenario_calculator: ScenarioCalculator::new(cost_model),
        }
    }

    /// 当前生效的成本常量
    pub fn cost_constants(&self) -> ApiResult<CostConstants> {
        Ok(self.config_manager.load_cost_constants()?)
    }

    fn aggregate_repo(&self, constants: &CostConstants) -> AggregateRepository {
        AggregateRepository::new(self.conn.clone(), constants.default_quality_score)
    }

    /// 驾驶舱总览
    pub fn overview(&self, range: DateRange) -> ApiResult<OverviewResponse> {
        let constants = self.cost_constants()?;
        let repo = self.aggregate_repo(&constants);

        let aggregate = repo.period_aggregate(range.from, range.to)?;
        let profit =
            self.cost_model
                .profit_breakdown(&aggregate, DEFAULT_TARGET_COMPLIANCE, &constants);
        let ranked = self
            .risk_scorer
            .rank(&repo.procedure_aggregates(range.from, range.to)?);
        let high_risk_procedures = ranked
            .iter()
            .filter(|p| p.risk_category >= RiskCategory::High)
            .count();

        tracing::info!(
            from = %range.from,
            to = %range.to,
            work_orders = aggregate.work_order_count,
            total_cost = profit.breakdown.total,
            "驾驶舱总览查询完成"
        );

        Ok(OverviewResponse {
            range,
            compliance_rate: aggregate.compliance_rate(),
            incident_rate: aggregate.incident_rate(),
            aggregate,
            profit,
            high_risk_procedures,
        })
    }

    /// 成本分解（利润侵蚀）
    ///
    /// # 参数
    /// - target_compliance: 目标合规率，缺省 95
    pub fn costs(
        &self,
        range: DateRange,
        target_compliance: Option<f64>,
    ) -> ApiResult<ProfitBreakdown> {
        let target = target_compliance.unwrap_or(DEFAULT_TARGET_COMPLIANCE);
        validate_percentage("target_compliance", target)?;

        let constants = self.cost_constants()?;
        let aggregate = self
            .aggregate_repo(&constants)
            .period_aggregate(range.from, range.to)?;

        Ok(self
            .cost_model
            .profit_breakdown(&aggregate, target, &constants))
    }

    /// 规程风险排行
    ///
    /// # 参数
    /// - limit: 返回前 N 条，缺省全部
    pub fn risk_ranking(
        &self,
        range: DateRange,
        limit: Option<usize>,
    ) -> ApiResult<Vec<ProcedureRiskProfile>> {
        let constants = self.cost_constants()?;
        let aggregates = self
            .aggregate_repo(&constants)
            .procedure_aggregates(range.from, range.to)?;

        let mut ranked = self.risk_scorer.rank(&aggregates);
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        for profile in &mut ranked {
            profile.recommendation = i18n::t(profile.risk_category.i18n_key());
        }
        Ok(ranked)
    }

    /// 月度趋势 + 预测
    ///
    /// # 参数
    /// - months: 预测月数，缺省取成本常量 projection_months
    pub fn trends(&self, range: DateRange, months: Option<u32>) -> ApiResult<TrendResponse> {
        let constants = self.cost_constants()?;
        let months = months.unwrap_or(constants.projection_months);
        if months > MAX_PROJECTION_MONTHS {
            return Err(ApiError::InvalidInput(format!(
                "预测月数不能超过{}",
                MAX_PROJECTION_MONTHS
            )));
        }

        let history = self
            .aggregate_repo(&constants)
            .monthly_aggregates(range.from, range.to)?;
        let projection = self.trend_projector.project(&history, months, &constants);

        Ok(TrendResponse {
            cost_trend_label: i18n::t(projection.cost_trend.i18n_key()),
            compliance_trend_label: i18n::t(projection.compliance_trend.i18n_key()),
            projection,
        })
    }

    /// 情景模拟 / ROI
    pub fn evaluate_scenario(
        &self,
        range: DateRange,
        scenario: &Scenario,
    ) -> ApiResult<ScenarioResult> {
        validate_scenario(scenario)?;

        let constants = self.cost_constants()?;
        let baseline = self
            .aggregate_repo(&constants)
            .period_aggregate(range.from, range.to)?;

        Ok(self
            .scenario_calculator
            .evaluate(scenario, &baseline, &constants))
    }

    /// 设施 / 人员维度汇总（按风险分降序）
    pub fn group_summaries(
        &self,
        dimension: GroupDimension,
        range: DateRange,
    ) -> ApiResult<Vec<GroupSummary>> {
        let constants = self.cost_constants()?;
        let groups = self
            .aggregate_repo(&constants)
            .group_aggregates(dimension, range.from, range.to)?;

        let mut summaries: Vec<GroupSummary> = groups
            .iter()
            .map(|g| {
                self.risk_scorer
                    .summarize_group(g, &self.cost_model, &constants)
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.risk_score
                .total_cmp(&a.risk_score)
                .then_with(|| a.group_id.cmp(&b.group_id))
        });
        Ok(summaries)
    }

    /// 智能问答上下文
    pub fn dashboard_context(&self, range: DateRange) -> ApiResult<DashboardContext> {
        let constants = self.cost_constants()?;
        let repo = self.aggregate_repo(&constants);

        let aggregate = repo.period_aggregate(range.from, range.to)?;
        let profit =
            self.cost_model
                .profit_breakdown(&aggregate, DEFAULT_TARGET_COMPLIANCE, &constants);
        let ranked = self
            .risk_scorer
            .rank(&repo.procedure_aggregates(range.from, range.to)?);
        let history = repo.monthly_aggregates(range.from, range.to)?;
        let projection =
            self.trend_projector
                .project(&history, CONTEXT_PROJECTION_MONTHS, &constants);

        Ok(DashboardContext::build(
            range.from,
            range.to,
            &aggregate,
            &profit,
            &ranked,
            &projection,
        ))
    }
}

fn validate_percentage(field: &str, value: f64) -> ApiResult<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ApiError::InvalidInput(format!(
            "{}必须在0到100之间: {}",
            field, value
        )));
    }
    Ok(())
}

fn validate_non_negative(field: &str, value: f64) -> ApiResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::InvalidInput(format!(
            "{}不能为负数: {}",
            field, value
        )));
    }
    Ok(())
}

fn validate_scenario(scenario: &Scenario) -> ApiResult<()> {
    validate_percentage("target_compliance", scenario.target_compliance)?;
    validate_non_negative("work_order_volume", scenario.work_order_volume)?;
    validate_non_negative("labor_cost_per_hour", scenario.labor_cost_per_hour)?;
    validate_non_negative("implementation_cost", scenario.implementation_cost)?;
    Ok(())
}
