// ==========================================
// 价格数据导入服务 - API层错误类型
// ==========================================
// 职责: 汇总导入/导出/仓储错误，映射为 HTTP 状态码与 JSON 错误体
// 约束: 存储与序列化错误只返回通用提示，细节写日志
// ==========================================

use crate::exporter::error::ExportError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求本身不合法（缺少文件字段、未知归档类型、筛选参数格式错误）
    #[error("无效输入: {0}")]
    BadInput(String),

    /// 上传的归档无法解析
    #[error("归档文件损坏: {0}")]
    ArchiveCorrupt(String),

    /// 事务/查询/锁失败
    #[error("存储失败: {0}")]
    StorageFailure(String),

    /// CSV 或 ZIP 序列化失败
    #[error("导出失败: {0}")]
    ExportFailure(String),

    /// 后台任务异常（panic / 取消）
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadInput(_) => StatusCode::BAD_REQUEST,
            ApiError::ArchiveCorrupt(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::StorageFailure(_) | ApiError::ExportFailure(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 错误码（JSON `error` 字段）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadInput(_) => "bad_request",
            ApiError::ArchiveCorrupt(_) => "archive_corrupt",
            ApiError::StorageFailure(_) => "storage_error",
            ApiError::ExportFailure(_) => "export_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

// ==========================================
// 错误转换
// ==========================================

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::BadInput(msg) => ApiError::BadInput(msg),
            ImportError::ArchiveCorrupt(msg) => ApiError::ArchiveCorrupt(msg),
            ImportError::Storage(e) => ApiError::from(e),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::BadFilter(msg) => ApiError::BadInput(msg),
            ExportError::Storage(e) => ApiError::from(e),
            other => ApiError::ExportFailure(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::StorageFailure(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// HTTP 响应
// ==========================================

/// JSON 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::BadInput(msg) | ApiError::ArchiveCorrupt(msg) => msg.clone(),
            ApiError::StorageFailure(detail) => {
                tracing::error!(error = %detail, "存储错误");
                "存储服务异常，请稍后重试".to_string()
            }
            ApiError::ExportFailure(detail) => {
                tracing::error!(error = %detail, "导出错误");
                "导出文件生成失败".to_string()
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "内部错误");
                "服务内部错误".to_string()
            }
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            message: Some(message),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
