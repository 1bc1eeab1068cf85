// ==========================================
// 作业合规运营洞察系统 - HTTP 路由
// ==========================================
// 框架: axum 0.7
// 约定: 同步 API 调用放入 spawn_blocking，避免阻塞运行时
// ==========================================

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::{ChatAnswer, DateRange, OverviewResponse, TrendResponse};
use crate::app::common::{parse_optional, parse_optional_date};
use crate::app::state::AppState;
use crate::config::CostConstants;
use crate::domain::cost::ProfitBreakdown;
use crate::domain::risk::{GroupSummary, ProcedureRiskProfile};
use crate::domain::scenario::{Scenario, ScenarioResult};
use crate::domain::types::GroupDimension;
use crate::domain::work_order::{WorkOrder, WorkOrderFilter};
use crate::importer::ImportSummary;

type SharedState = Arc<AppState>;

/// 构建路由
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/api/v1/overview", get(overview_handler))
        .route("/api/v1/costs", get(costs_handler))
        .route("/api/v1/risk/procedures", get(risk_ranking_handler))
        .route("/api/v1/trends", get(trends_handler))
        .route("/api/v1/scenario", post(scenario_handler))
        .route("/api/v1/facilities", get(facilities_handler))
        .route("/api/v1/workers", get(workers_handler))
        .route(
            "/api/v1/work-orders",
            get(list_work_orders_handler).post(create_work_order_handler),
        )
        .route("/api/v1/work-orders/import", post(import_work_orders_handler))
        .route(
            "/api/v1/work-orders/:id",
            get(get_work_order_handler).delete(delete_work_order_handler),
        )
        .route("/api/v1/config/cost-constants", get(cost_constants_handler))
        .route("/api/v1/chat", post(chat_handler))
        .with_state(state)
}

/// 在阻塞线程池执行同步 API 调用
async fn run_blocking<T, F>(state: SharedState, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> ApiResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(state.as_ref()))
        .await
        .map_err(|e| ApiError::InternalError(format!("后台任务失败: {}", e)))?
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(v)| v)
        .map_err(|e| ApiError::InvalidInput(format!("请求体格式错误: {}", e.body_text())))
}

// ==========================================
// 查询参数
// ==========================================

/// 区间查询参数（日期 YYYY-MM-DD）
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RangeParams {
    fn resolve(&self) -> ApiResult<DateRange> {
        DateRange::resolve(
            parse_optional_date(self.from.as_deref())?,
            parse_optional_date(self.to.as_deref())?,
            Local::now().date_naive(),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CostParams {
    #[serde(flatten)]
    pub range: RangeParams,
    pub target_compliance: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RiskParams {
    #[serde(flatten)]
    pub range: RangeParams,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendParams {
    #[serde(flatten)]
    pub range: RangeParams,
    pub months: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkOrderListParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub procedure_id: Option<String>,
    pub facility_id: Option<String>,
    pub worker_id: Option<String>,
    pub is_compliant: Option<String>,
    pub limit: Option<String>,
}

/// 情景模拟请求体（基线区间可选）
#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    #[serde(flatten)]
    pub scenario: Scenario,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    pub question: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ==========================================
// 处理函数
// ==========================================

async fn healthz_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn overview_handler(
    State(state): State<SharedState>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Json<OverviewResponse>> {
    let range = params.resolve()?;
    run_blocking(state, move |s| s.dashboard_api.overview(range))
        .await
        .map(Json)
}

async fn costs_handler(
    State(state): State<SharedState>,
    Query(params): Query<CostParams>,
) -> ApiResult<Json<ProfitBreakdown>> {
    let range = params.range.resolve()?;
    let target = parse_optional::<f64>("target_compliance", params.target_compliance.as_deref())?;
    run_blocking(state, move |s| s.dashboard_api.costs(range, target))
        .await
        .map(Json)
}

async fn risk_ranking_handler(
    State(state): State<SharedState>,
    Query(params): Query<RiskParams>,
) -> ApiResult<Json<Vec<ProcedureRiskProfile>>> {
    let range = params.range.resolve()?;
    let limit = parse_optional::<usize>("limit", params.limit.as_deref())?;
    run_blocking(state, move |s| s.dashboard_api.risk_ranking(range, limit))
        .await
        .map(Json)
}

async fn trends_handler(
    State(state): State<SharedState>,
    Query(params): Query<TrendParams>,
) -> ApiResult<Json<TrendResponse>> {
    let range = params.range.resolve()?;
    let months = parse_optional::<u32>("months", params.months.as_deref())?;
    run_blocking(state, move |s| s.dashboard_api.trends(range, months))
        .await
        .map(Json)
}

async fn scenario_handler(
    State(state): State<SharedState>,
    body: Result<Json<ScenarioRequest>, JsonRejection>,
) -> ApiResult<Json<ScenarioResult>> {
    let request = json_body(body)?;
    let range = RangeParams {
        from: request.from,
        to: request.to,
    }
    .resolve()?;
    let scenario = request.scenario;
    run_blocking(state, move |s| {
        s.dashboard_api.evaluate_scenario(range, &scenario)
    })
    .await
    .map(Json)
}

async fn facilities_handler(
    State(state): State<SharedState>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Json<Vec<GroupSummary>>> {
    group_summaries(state, GroupDimension::Facility, params).await
}

async fn workers_handler(
    State(state): State<SharedState>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Json<Vec<GroupSummary>>> {
    group_summaries(state, GroupDimension::Worker, params).await
}

async fn group_summaries(
    state: SharedState,
    dimension: GroupDimension,
    params: RangeParams,
) -> ApiResult<Json<Vec<GroupSummary>>> {
    let range = params.resolve()?;
    run_blocking(state, move |s| {
        s.dashboard_api.group_summaries(dimension, range)
    })
    .await
    .map(Json)
}

async fn list_work_orders_handler(
    State(state): State<SharedState>,
    Query(params): Query<WorkOrderListParams>,
) -> ApiResult<Json<Vec<WorkOrder>>> {
    let filter = WorkOrderFilter {
        date_from: parse_optional_date(params.from.as_deref())?,
        date_to: parse_optional_date(params.to.as_deref())?,
        procedure_id: params.procedure_id.filter(|s| !s.trim().is_empty()),
        facility_id: params.facility_id.filter(|s| !s.trim().is_empty()),
        worker_id: params.worker_id.filter(|s| !s.trim().is_empty()),
        is_compliant: parse_optional::<bool>("is_compliant", params.is_compliant.as_deref())?,
        limit: parse_optional::<usize>("limit", params.limit.as_deref())?,
    };
    run_blocking(state, move |s| s.work_order_api.list(&filter))
        .await
        .map(Json)
}

async fn create_work_order_handler(
    State(state): State<SharedState>,
    body: Result<Json<WorkOrder>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<WorkOrder>)> {
    let work_order = json_body(body)?;
    let created = run_blocking(state, move |s| s.work_order_api.create(&work_order)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn import_work_orders_handler(
    State(state): State<SharedState>,
    body: axum::body::Bytes,
) -> ApiResult<Json<ImportSummary>> {
    run_blocking(state, move |s| s.work_order_api.import_csv(&body))
        .await
        .map(Json)
}

async fn get_work_order_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkOrder>> {
    run_blocking(state, move |s| s.work_order_api.get(&id))
        .await
        .map(Json)
}

async fn delete_work_order_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    run_blocking(state, move |s| s.work_order_api.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn cost_constants_handler(
    State(state): State<SharedState>,
) -> ApiResult<Json<CostConstants>> {
    run_blocking(state, |s| s.dashboard_api.cost_constants())
        .await
        .map(Json)
}

async fn chat_handler(
    State(state): State<SharedState>,
    body: Result<Json<ChatRequestBody>, JsonRejection>,
) -> ApiResult<Json<ChatAnswer>> {
    let request = json_body(body)?;
    let range = RangeParams {
        from: request.from,
        to: request.to,
    }
    .resolve()?;

    let chat_api = state.chat_api.clone();
    chat_api.ask(&request.question, range).await.map(Json)
}
