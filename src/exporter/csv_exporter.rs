// ==========================================
// 价格数据导入服务 - CSV 导出器
// ==========================================
// 输出: 新建 ZIP，唯一成员 data.csv（deflate）
// 格式: 表头 id,name,category,price,create_date；价格两位小数；日期 YYYY-MM-DD
// ==========================================

use crate::domain::price::{PriceFilter, PriceRecord};
use crate::exporter::error::{ExportError, ExportResult};
use crate::repository::PriceRepository;
use std::io::{Cursor, Write};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 导出归档中的 CSV 成员名
pub const EXPORT_MEMBER_NAME: &str = "data.csv";

/// 导出 CSV 表头（与导入列布局一致）
pub const EXPORT_HEADER: [&str; 5] = ["id", "name", "category", "price", "create_date"];

/// 记录 → CSV 字节
pub fn write_csv(records: &[PriceRecord]) -> ExportResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for record in records {
        writer.write_record([
            record.id.to_string(),
            record.name.clone(),
            record.category.clone(),
            format!("{:.2}", record.price),
            record.create_date.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// CSV 字节 → 单成员 ZIP
pub fn package_zip(csv_bytes: &[u8]) -> ExportResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(EXPORT_MEMBER_NAME, options)?;
    zip.write_all(csv_bytes)?;

    Ok(zip.finish()?.into_inner())
}

// ==========================================
// PriceExporter - 筛选导出
// ==========================================
pub struct PriceExporter {
    repo: Arc<PriceRepository>,
}

impl PriceExporter {
    pub fn new(repo: Arc<PriceRepository>) -> Self {
        Self { repo }
    }

    /// 按筛选条件导出为 ZIP 字节
    ///
    /// 结果为空时仍返回只含表头的合法归档
    #[instrument(skip(self))]
    pub fn export_archive(&self, filter: &PriceFilter) -> ExportResult<Vec<u8>> {
        let records = self.repo.query_filtered(filter)?;
        debug!(rows = records.len(), unfiltered = filter.is_empty(), "筛选查询完成");

        let csv_bytes = write_csv(&records)?;
        let archive = package_zip(&csv_bytes)?;

        info!(rows = records.len(), bytes = archive.len(), "价格数据导出完成");
        Ok(archive)
    }
}
