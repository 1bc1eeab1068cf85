// ==========================================
// 作业合规运营洞察系统 - API层错误类型
// ==========================================
// 职责: 统一 Repository / Import / Chat 错误为 API 错误
// 约定: 数据库与 LLM 故障对用户只显示通用重试提示，细节写日志
// ==========================================

use crate::chat::ChatError;
use crate::importer::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 外部服务错误
    // ==========================================
    #[error("智能问答未配置")]
    ChatNotConfigured,

    #[error("上游服务失败: {0}")]
    UpstreamError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 是否属于“请稍后重试”类故障（数据库 / 上游 / 内部）
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::DatabaseError(_)
                | ApiError::DatabaseConnectionError(_)
                | ApiError::DatabaseTransactionError(_)
                | ApiError::UpstreamError(_)
                | ApiError::InternalError(_)
        )
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Repository(repo_err) => repo_err.into(),
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件 {}", path)),
            ImportError::UnsupportedFormat(_)
            | ImportError::CsvParseError(_)
            | ImportError::MissingColumn(_) => ApiError::ImportError(err.to_string()),
            ImportError::FileReadError(msg) => ApiError::InternalError(msg),
        }
    }
}

// ==========================================
// 从 ChatError 转换
// ==========================================
impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::NotConfigured => ApiError::ChatNotConfigured,
            ChatError::Upstream(msg) | ChatError::InvalidResponse(msg) => {
                ApiError::UpstreamError(msg)
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "WorkOrder".to_string(),
            id: "WO-001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("WorkOrder"));
                assert!(msg.contains("WO-001"));
            }
            _ => panic!("Expected NotFound"),
        }

        let api_err: ApiError = RepositoryError::FieldValueError {
            field: "procedure_id".to_string(),
            message: "不能为空".to_string(),
        }
        .into();
        assert!(matches!(api_err, ApiError::InvalidInput(_)));
        assert!(!api_err.is_retryable());
    }

    #[test]
    fn test_database_errors_are_retryable() {
        let api_err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(api_err.is_retryable());
    }

    #[test]
    fn test_import_error_conversion() {
        let api_err: ApiError = ImportError::CsvParseError("bad quote".to_string()).into();
        assert!(matches!(api_err, ApiError::ImportError(_)));

        let api_err: ApiError =
            ImportError::Repository(RepositoryError::DatabaseQueryError("x".to_string())).into();
        assert!(matches!(api_err, ApiError::DatabaseError(_)));
    }

    #[test]
    fn test_chat_error_conversion() {
        let api_err: ApiError = ChatError::NotConfigured.into();
        assert!(matches!(api_err, ApiError::ChatNotConfigured));

        let api_err: ApiError = ChatError::Upstream("status 529".to_string()).into();
        assert!(api_err.is_retryable());
    }
}
