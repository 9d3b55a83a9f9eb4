// ==========================================
// 价格数据导入服务 - 价格导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 归档解包 → CSV 解析 → 字段校验 → 批内去重 → 事务落库
// ==========================================

use crate::domain::price::{ArchiveMember, IngestionBatch, IngestionSummary};
use crate::domain::row::{RawRow, RowOutcome};
use crate::domain::types::{ArchiveKind, IdentifierMode};
use crate::importer::error::ImportResult;

// ==========================================
// PriceImporter Trait
// ==========================================
// 用途: 价格导入主接口
// 实现者: PriceImporterImpl
pub trait PriceImporter: Send + Sync {
    /// 导入一个上传的归档
    ///
    /// # 参数
    /// - archive: 归档原始字节
    /// - kind: 归档类型
    ///
    /// # 返回
    /// - Ok(IngestionSummary): 本次计数 + 落库后的全库统计
    /// - Err(ArchiveCorrupt): 归档无法解析，未处理任何行
    /// - Err(Storage): 事务失败，已回滚
    fn import_archive(&self, archive: &[u8], kind: ArchiveKind) -> ImportResult<IngestionSummary>;
}

// ==========================================
// ArchiveExtractor Trait
// ==========================================
// 用途: 从归档中取出 CSV 成员（阶段 0）
// 实现者: UniversalArchiveExtractor
pub trait ArchiveExtractor: Send + Sync {
    /// 解包并筛选 CSV 成员（按归档顺序，全部读入内存）
    ///
    /// 任何结构错误都让整个解包失败，不返回部分结果
    fn extract(&self, archive: &[u8], kind: ArchiveKind) -> ImportResult<Vec<ArchiveMember>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: CSV 内容 → 原始行（阶段 1）
// 实现者: CsvRecordParser
pub trait FileParser: Send + Sync {
    /// 解析单个 CSV 成员
    ///
    /// 表头行已丢弃；返回的每一行都计入 total_count
    fn parse_rows(&self, content: &[u8]) -> Vec<RawRow>;
}

// ==========================================
// FieldValidator Trait
// ==========================================
// 用途: 单行规范化与校验（阶段 2）
// 实现者: PriceFieldValidator
pub trait FieldValidator: Send + Sync {
    /// 校验单行，第一个失败的检查决定拒绝原因
    fn validate(&self, row: &RawRow, file_name: &str) -> RowOutcome;
}

// ==========================================
// ConflictHandler Trait
// ==========================================
// 用途: 批内去重（阶段 3），库内去重由事务写入负责
// 实现者: ConflictHandler
pub trait ConflictHandler: Send + Sync {
    /// 剔除批内重复，保留首次出现
    ///
    /// # 返回
    /// - (保留的记录, 被剔除的条数)
    fn dedup_in_batch(&self, batch: IngestionBatch, mode: IdentifierMode) -> (IngestionBatch, usize);
}
