// ==========================================
// 价格导出API
// ==========================================
// 职责: 解析筛选参数，生成导出归档
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::price::PriceFilter;
use crate::exporter::{ExportError, PriceExporter};
use crate::repository::PriceRepository;
use serde::Deserialize;
use std::sync::Arc;

/// 导出筛选查询参数（原样字符串，由 PriceFilter 负责解析）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

impl ExportQuery {
    /// 解析为筛选条件
    pub fn to_filter(&self) -> Result<PriceFilter, ExportError> {
        PriceFilter::parse(
            self.start.as_deref(),
            self.end.as_deref(),
            self.min.as_deref(),
            self.max.as_deref(),
        )
        .map_err(ExportError::BadFilter)
    }
}

/// 导出API
pub struct ExportApi {
    exporter: PriceExporter,
}

impl ExportApi {
    pub fn new(repo: Arc<PriceRepository>) -> Self {
        Self {
            exporter: PriceExporter::new(repo),
        }
    }

    /// 按筛选条件导出 ZIP（唯一成员 data.csv）
    pub fn export_prices(&self, query: &ExportQuery) -> ApiResult<Vec<u8>> {
        let filter = query.to_filter()?;
        Ok(self.exporter.export_archive(&filter)?)
    }
}
