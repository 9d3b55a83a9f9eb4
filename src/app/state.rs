// ==========================================
// 价格数据导入服务 - 应用状态
// ==========================================
// 职责: 持有唯一的数据库连接句柄与各 API 实例
// 生命周期: main 中创建，随 HTTP 服务关闭而释放（连接随之关闭）
// ==========================================

use crate::api::{ExportApi, ImportApi};
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::domain::types::IdentifierMode;
use crate::repository::{PriceRepository, RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 应用状态
///
/// 克隆开销只有几个 Arc，axum 每个请求持有一份
#[derive(Clone)]
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 价格导入API
    pub import_api: Arc<ImportApi>,

    /// 价格导出API
    pub export_api: Arc<ExportApi>,

    /// 价格仓储（健康检查/统计）
    pub price_repo: Arc<PriceRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并应用统一 PRAGMA
    /// 2. 初始化 schema，版本不一致时告警
    /// 3. 创建 Repository 与 API 实例
    pub fn new(db_path: String, mode: IdentifierMode) -> RepositoryResult<Self> {
        tracing::info!(db_path = %db_path, mode = %mode, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(format!("无法打开数据库: {}", e)))?;
        init_schema(&conn)?;

        match read_schema_version(&conn)? {
            Some(v) if v == CURRENT_SCHEMA_VERSION => {}
            other => tracing::warn!(
                found = ?other,
                expected = CURRENT_SCHEMA_VERSION,
                "schema_version 与当前代码不一致"
            ),
        }

        let mut state = Self::from_connection(Arc::new(Mutex::new(conn)), mode);
        state.db_path = db_path;
        Ok(state)
    }

    /// 从已有连接创建（连接需已完成 schema 初始化）
    pub fn from_connection(conn: Arc<Mutex<Connection>>, mode: IdentifierMode) -> Self {
        let price_repo = Arc::new(PriceRepository::from_connection(conn));

        Self {
            db_path: String::new(),
            import_api: Arc::new(ImportApi::new(price_repo.clone(), mode)),
            export_api: Arc::new(ExportApi::new(price_repo.clone())),
            price_repo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_initializes_schema() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let db_path = temp.path().to_str().unwrap().to_string();

        let state = AppState::new(db_path.clone(), IdentifierMode::Content).unwrap();

        assert_eq!(state.db_path, db_path);
        assert_eq!(state.import_api.mode(), IdentifierMode::Content);
        assert_eq!(state.price_repo.store_stats().unwrap().total_items, 0);
    }
}
