// ==========================================
// 价格数据导入服务 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod price_repo;
pub mod query_filter;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use price_repo::PriceRepository;
pub use query_filter::{build_export_query, PriceQueryBuilder};
