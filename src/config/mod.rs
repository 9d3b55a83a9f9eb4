// ==========================================
// 价格数据导入服务 - 配置层
// ==========================================

pub mod app_config;

pub use app_config::{get_default_db_path, AppConfig};
