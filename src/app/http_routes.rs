// ==========================================
// 价格数据导入服务 - HTTP 路由
// ==========================================
// 路由:
// - POST /api/v0/prices?type=zip|tar  上传归档（multipart 字段 file）
// - GET  /api/v0/prices?start&end&min&max  导出 data.zip
// - GET  /health  健康检查
// 约束: 导入/导出管道是同步的，放到 blocking 线程池执行
// ==========================================

use crate::api::{ApiError, ApiResult, ExportQuery, ImportApi};
use crate::app::state::AppState;
use crate::domain::price::IngestionSummary;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

/// 价格接口路径
pub const PRICES_PATH: &str = "/api/v0/prices";

/// multipart 中的文件字段名
pub const UPLOAD_FIELD: &str = "file";

/// 构建完整路由
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(PRICES_PATH, post(upload_prices).get(export_prices))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

// ==========================================
// 健康检查
// ==========================================

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ==========================================
// 导入
// ==========================================

/// 上传查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

async fn upload_prices(
    State(state): State<AppState>,
    query: Result<Query<UploadQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<IngestionSummary>> {
    let Query(query) = query.map_err(|e| ApiError::BadInput(e.body_text()))?;
    // 归档类型先于读取请求体校验
    let kind = ImportApi::resolve_kind(query.kind.as_deref())?;

    let mut multipart = multipart.map_err(|e| ApiError::BadInput(e.body_text()))?;
    let archive = read_upload_field(&mut multipart).await?;

    let api = state.import_api.clone();
    let summary = tokio::task::spawn_blocking(move || api.import_prices(&archive, kind)).await??;

    Ok(Json(summary))
}

/// 读取 multipart 中名为 `file` 的字段（其余字段忽略）
async fn read_upload_field(multipart: &mut Multipart) -> ApiResult<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadInput(format!("上传数据读取失败: {}", e.body_text())))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadInput(format!("上传文件读取失败: {}", e.body_text())))?;
        return Ok(bytes.to_vec());
    }

    Err(ApiError::BadInput(format!(
        "缺少文件字段: {}",
        UPLOAD_FIELD
    )))
}

// ==========================================
// 导出
// ==========================================

async fn export_prices(
    State(state): State<AppState>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query.map_err(|e| ApiError::BadInput(e.body_text()))?;

    let api = state.export_api.clone();
    let archive = tokio::task::spawn_blocking(move || api.export_prices(&query)).await??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"data.zip\""),
        ],
        archive,
    )
        .into_response())
}
