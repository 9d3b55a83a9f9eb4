// ==========================================
// 价格数据导入服务 - 价格导入器实现
// ==========================================
// 职责: 整合导入流程，从上传归档到数据库
// 流程: 解包 → 解析 → 校验 → 批内去重 → 事务落库 → 全库统计
// ==========================================

use crate::domain::price::{IngestionBatch, IngestionSummary};
use crate::domain::row::{RejectReason, RowOutcome};
use crate::domain::types::{ArchiveKind, IdentifierMode};
use crate::importer::archive_extractor::UniversalArchiveExtractor;
use crate::importer::conflict_handler::ConflictHandler as ConflictHandlerImpl;
use crate::importer::error::ImportResult;
use crate::importer::field_validator::PriceFieldValidator;
use crate::importer::file_parser::CsvRecordParser;
use crate::importer::price_importer_trait::{
    ArchiveExtractor, ConflictHandler, FieldValidator, FileParser, PriceImporter,
};
use crate::repository::PriceRepository;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, Span};
use uuid::Uuid;

// ==========================================
// PriceImporterImpl - 价格导入器实现
// ==========================================
pub struct PriceImporterImpl {
    // 数据访问层
    repo: Arc<PriceRepository>,

    // 标识模式（进程级配置）
    mode: IdentifierMode,

    // 导入组件
    archive_extractor: Box<dyn ArchiveExtractor>,
    file_parser: Box<dyn FileParser>,
    field_validator: Box<dyn FieldValidator>,
    conflict_handler: Box<dyn ConflictHandler>,
}

impl PriceImporterImpl {
    /// 创建新的 PriceImporter 实例
    ///
    /// # 参数
    /// - repo: 价格仓储
    /// - mode: 标识模式
    /// - archive_extractor: 归档解包器
    /// - file_parser: CSV 解析器
    /// - field_validator: 字段校验器
    /// - conflict_handler: 冲突处理器
    pub fn new(
        repo: Arc<PriceRepository>,
        mode: IdentifierMode,
        archive_extractor: Box<dyn ArchiveExtractor>,
        file_parser: Box<dyn FileParser>,
        field_validator: Box<dyn FieldValidator>,
        conflict_handler: Box<dyn ConflictHandler>,
    ) -> Self {
        Self {
            repo,
            mode,
            archive_extractor,
            file_parser,
            field_validator,
            conflict_handler,
        }
    }

    /// 使用默认组件装配
    pub fn with_defaults(repo: Arc<PriceRepository>, mode: IdentifierMode) -> Self {
        Self::new(
            repo,
            mode,
            Box::new(UniversalArchiveExtractor),
            Box::new(CsvRecordParser),
            Box::new(PriceFieldValidator::new(mode)),
            Box::new(ConflictHandlerImpl),
        )
    }
}

impl PriceImporter for PriceImporterImpl {
    #[instrument(skip(self, archive), fields(batch_id, kind = %kind, bytes = archive.len()))]
    fn import_archive(&self, archive: &[u8], kind: ArchiveKind) -> ImportResult<IngestionSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        Span::current().record("batch_id", batch_id.as_str());

        info!(mode = %self.mode, "开始导入价格数据");

        // === 步骤 1: 解包归档 ===
        debug!("步骤 1: 解包归档");
        let members = self.archive_extractor.extract(archive, kind).map_err(|e| {
            error!(error = %e, "归档解包失败");
            e
        })?;
        debug!(members = members.len(), "归档解包完成");

        // === 步骤 2: 解析 + 校验 ===
        debug!("步骤 2: 解析与字段校验");
        let mut total_count = 0usize;
        let mut batch: IngestionBatch = Vec::new();
        let mut rejected: HashMap<RejectReason, usize> = HashMap::new();

        for member in &members {
            let rows = self.file_parser.parse_rows(&member.content);
            total_count += rows.len();

            for row in &rows {
                match self.field_validator.validate(row, &member.name) {
                    RowOutcome::Accepted(record) => batch.push(record),
                    RowOutcome::Rejected(reason) => {
                        *rejected.entry(reason).or_default() += 1;
                    }
                }
            }
        }
        debug!(
            total = total_count,
            accepted = batch.len(),
            rejected = ?rejected,
            "字段校验完成"
        );

        // === 步骤 3: 批内去重 ===
        debug!("步骤 3: 批内去重");
        let (batch, in_batch_duplicates) = self.conflict_handler.dedup_in_batch(batch, self.mode);
        debug!(
            candidates = batch.len(),
            in_batch_duplicates = in_batch_duplicates,
            "批内去重完成"
        );

        // === 步骤 4: 事务落库 ===
        debug!("步骤 4: 事务落库");
        let outcome = self.repo.write_batch(&batch, self.mode).map_err(|e| {
            error!(error = %e, "事务写入失败，已回滚");
            e
        })?;
        debug!(
            inserted = outcome.inserted,
            duplicates = outcome.duplicates,
            "事务提交完成"
        );

        // === 步骤 5: 全库统计 ===
        let stats = self.repo.store_stats().map_err(|e| {
            error!(error = %e, "统计查询失败");
            e
        })?;

        let summary = IngestionSummary::new(
            total_count,
            in_batch_duplicates + outcome.duplicates,
            stats,
        );

        info!(
            batch_id = %batch_id,
            total = summary.total_count,
            inserted = outcome.inserted,
            duplicates = summary.duplicates_count,
            total_items = summary.total_items,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "价格数据导入完成"
        );

        Ok(summary)
    }
}
