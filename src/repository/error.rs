// ==========================================
// 价格数据导入服务 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("约束检查失败: {0}")]
    CheckConstraintViolation(String),

    // ===== 数据质量错误 =====
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },
}

/// prices 表列名（按 SELECT_PRICES 的列顺序）
const PRICE_COLUMNS: [&str; 5] = ["id", "name", "category", "price_cents", "create_date"];

fn column_name(idx: usize) -> String {
    PRICE_COLUMNS
        .get(idx)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("#{}", idx))
}

// SQLite 约束失败按消息前缀归类，其余统一视为查询失败
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                RepositoryError::UniqueConstraintViolation(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("CHECK") => {
                RepositoryError::CheckConstraintViolation(msg)
            }
            rusqlite::Error::FromSqlConversionFailure(idx, _, e) => RepositoryError::FieldValueError {
                field: column_name(idx),
                message: e.to_string(),
            },
            rusqlite::Error::InvalidColumnType(idx, name, ty) => RepositoryError::FieldValueError {
                field: if name.is_empty() { column_name(idx) } else { name },
                message: format!("意外的列类型 {}", ty),
            },
            other => RepositoryError::DatabaseQueryError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
