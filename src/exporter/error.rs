// ==========================================
// 价格数据导入服务 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    // ===== 请求错误 =====
    #[error("筛选参数错误: {0}")]
    BadFilter(String),

    // ===== 序列化错误 =====
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("ZIP 打包失败: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("写入缓冲区失败: {0}")]
    Io(#[from] std::io::Error),

    // ===== 数据库错误 =====
    #[error("查询失败: {0}")]
    Storage(#[from] RepositoryError),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
