// ==========================================
// 价格数据导入服务 - 导出层
// ==========================================
// 职责: 筛选查询 → CSV → ZIP
// ==========================================

pub mod csv_exporter;
pub mod error;

pub use csv_exporter::{package_zip, write_csv, PriceExporter, EXPORT_HEADER, EXPORT_MEMBER_NAME};
pub use error::{ExportError, ExportResult};
