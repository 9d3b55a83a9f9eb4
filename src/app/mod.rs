// ==========================================
// 价格数据导入服务 - 应用层
// ==========================================
// 职责: 应用状态与 HTTP 路由
// ==========================================

pub mod http_routes;
pub mod state;

pub use http_routes::{router, HealthResponse, PRICES_PATH, UPLOAD_FIELD};
pub use state::AppState;
