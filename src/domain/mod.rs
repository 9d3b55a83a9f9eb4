// ==========================================
// 价格数据导入服务 - 领域模型层
// ==========================================
// 职责: 定义价格记录、批次中间结构、类型与换算规则
// 红线: 不含数据访问逻辑,不含 HTTP 逻辑
// ==========================================

pub mod price;
pub mod row;
pub mod types;

// 重导出核心类型
pub use price::{
    cents_to_price, normalize_price, parse_decimal, parse_iso_date, price_to_cents,
    ArchiveMember, DedupKey, IngestionBatch, IngestionSummary, PriceFilter, PriceRecord,
    RowLocation, StoreStats, ValidatedRecord, WriteOutcome, MAX_PRICE_CENTS,
};
pub use row::{RawRow, RejectReason, RowOutcome};
pub use types::{ArchiveKind, IdentifierMode};
