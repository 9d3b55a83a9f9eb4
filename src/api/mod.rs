// ==========================================
// 价格数据导入服务 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 HTTP 路由调用
// ==========================================

pub mod error;
pub mod export_api;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use export_api::{ExportApi, ExportQuery};
pub use import_api::ImportApi;
