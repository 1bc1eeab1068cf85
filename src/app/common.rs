// ==========================================
// 作业合规运营洞察系统 - HTTP 公共工具
// ==========================================
// 错误映射、日期/数值参数解析
// ==========================================

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::i18n;

/// 错误响应（返回给调用方）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 错误代码（机器可读，不随语言变化）
pub fn error_code(err: &ApiError) -> &'static str {
    match err {
        ApiError::InvalidInput(_) => "INVALID_INPUT",
        ApiError::NotFound(_) => "NOT_FOUND",
        ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
        ApiError::ValidationError(_) => "VALIDATION_ERROR",
        ApiError::DatabaseError(_) => "DATABASE_ERROR",
        ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
        ApiError::DatabaseTransactionError(_) => "DATABASE_TRANSACTION_ERROR",
        ApiError::ImportError(_) => "IMPORT_ERROR",
        ApiError::ChatNotConfigured => "CHAT_NOT_CONFIGURED",
        ApiError::UpstreamError(_) => "UPSTREAM_ERROR",
        ApiError::InternalError(_) => "INTERNAL_ERROR",
    }
}

/// HTTP 状态码
pub fn status_code(err: &ApiError) -> StatusCode {
    match err {
        ApiError::InvalidInput(_) | ApiError::ValidationError(_) | ApiError::ImportError(_) => {
            StatusCode::BAD_REQUEST
        }
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiError::BusinessRuleViolation(_) => StatusCode::CONFLICT,
        ApiError::ChatNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        ApiError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
        ApiError::DatabaseError(_)
        | ApiError::DatabaseConnectionError(_)
        | ApiError::DatabaseTransactionError(_)
        | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// ApiError → ErrorResponse
///
/// 数据库 / 上游 / 内部故障只返回通用重试提示，原因写日志
pub fn map_api_error(err: &ApiError) -> ErrorResponse {
    let message = if err.is_retryable() {
        tracing::error!(code = error_code(err), error = %err, "请求处理失败");
        i18n::t("error.retry")
    } else if matches!(err, ApiError::ChatNotConfigured) {
        i18n::t("error.chat_not_configured")
    } else {
        err.to_string()
    };

    ErrorResponse {
        code: error_code(err).to_string(),
        message,
        details: None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (status_code(&self), Json(map_api_error(&self))).into_response()
    }
}

/// 解析日期字符串（YYYY-MM-DD）
pub fn parse_date(date_str: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|e| ApiError::InvalidInput(format!("日期格式错误（应为YYYY-MM-DD）: {}", e)))
}

/// 解析可选日期参数（空串视为缺省）
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_date(s).map(Some),
        None => Ok(None),
    }
}

/// 解析可选数值参数
pub fn parse_optional<T: std::str::FromStr>(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<T>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|_| ApiError::InvalidInput(format!("参数{}格式错误: {}", field, s))),
        None => Ok(None),
    }
}
