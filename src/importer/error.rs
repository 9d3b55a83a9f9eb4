// ==========================================
// 价格数据导入服务 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 行级校验失败不是错误（见 RowOutcome），这里只有整体中止的情况
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 请求错误 =====
    #[error("请求参数错误: {0}")]
    BadInput(String),

    // ===== 归档错误 =====
    #[error("归档文件损坏: {0}")]
    ArchiveCorrupt(String),

    // ===== 数据库错误 =====
    #[error("存储失败: {0}")]
    Storage(#[from] RepositoryError),
}

// 实现 From<zip::result::ZipError>
impl From<zip::result::ZipError> for ImportError {
    fn from(err: zip::result::ZipError) -> Self {
        ImportError::ArchiveCorrupt(err.to_string())
    }
}

// 实现 From<std::io::Error>
//
// 导入流程中的 IO 只发生在读取内存归档时
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::ArchiveCorrupt(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
