// ==========================================
// 价格导入API
// ==========================================
// 职责: 解析请求参数，调用导入管道，转换错误
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::price::IngestionSummary;
use crate::domain::types::{ArchiveKind, IdentifierMode};
use crate::importer::{PriceImporter, PriceImporterImpl};
use crate::repository::PriceRepository;
use std::sync::Arc;

/// 导入API
pub struct ImportApi {
    importer: Box<dyn PriceImporter>,
    mode: IdentifierMode,
}

impl ImportApi {
    /// 创建新的ImportApi实例（默认导入管道）
    pub fn new(repo: Arc<PriceRepository>, mode: IdentifierMode) -> Self {
        Self::with_importer(Box::new(PriceImporterImpl::with_defaults(repo, mode)), mode)
    }

    /// 使用自定义导入器
    pub fn with_importer(importer: Box<dyn PriceImporter>, mode: IdentifierMode) -> Self {
        Self { importer, mode }
    }

    pub fn mode(&self) -> IdentifierMode {
        self.mode
    }

    /// 解析 `type` 查询参数（缺省/空 → zip）
    pub fn resolve_kind(kind_indicator: Option<&str>) -> ApiResult<ArchiveKind> {
        ArchiveKind::from_indicator(kind_indicator).map_err(ApiError::BadInput)
    }

    /// 导入一个上传的归档
    ///
    /// # 参数
    /// - archive: 上传文件的完整字节
    /// - kind: 归档类型
    ///
    /// # 返回
    /// - Ok(IngestionSummary): 导入汇总
    /// - Err(ArchiveCorrupt / StorageFailure): 导入中止
    pub fn import_prices(&self, archive: &[u8], kind: ArchiveKind) -> ApiResult<IngestionSummary> {
        Ok(self.importer.import_archive(archive, kind)?)
    }
}
