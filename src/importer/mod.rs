// ==========================================
// 价格数据导入服务 - 导入层
// ==========================================
// 职责: 上传归档 → 校验 → 去重 → 落库
// 支持: ZIP / TAR 中的 CSV 成员
// ==========================================

// 模块声明
pub mod archive_extractor;
pub mod conflict_handler;
pub mod error;
pub mod field_validator;
pub mod file_parser;
pub mod price_importer_impl;
pub mod price_importer_trait;

// 重导出核心类型
pub use archive_extractor::{TarExtractor, UniversalArchiveExtractor, ZipExtractor};
pub use conflict_handler::ConflictHandler as ConflictHandlerImpl;
pub use error::{ImportError, ImportResult};
pub use field_validator::PriceFieldValidator;
pub use file_parser::CsvRecordParser;
pub use price_importer_impl::PriceImporterImpl;

// 重导出 Trait 接口
pub use price_importer_trait::{
    ArchiveExtractor, ConflictHandler, FieldValidator, FileParser, PriceImporter,
};
