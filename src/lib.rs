// ==========================================
// 价格数据导入服务 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 功能: 归档上传 → 校验去重 → 事务落库 → 筛选导出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 归档解析与校验
pub mod importer;

// 导出层 - CSV/ZIP 序列化
pub mod exporter;

// 配置层 - 进程配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    ArchiveKind, IdentifierMode, IngestionSummary, PriceFilter, PriceRecord, StoreStats,
};

pub use api::{ApiError, ExportApi, ImportApi};
pub use app::{router, AppState};
pub use config::AppConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "价格数据导入服务";
