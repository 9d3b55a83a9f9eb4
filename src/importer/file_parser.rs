// ==========================================
// 价格数据导入服务 - CSV 解析器实现
// ==========================================
// 格式: 逗号分隔，标准 CSV 引号规则，行长度可不一致
// 约定: 第一行固定为表头并丢弃
// ==========================================

use crate::domain::row::RawRow;
use crate::importer::price_importer_trait::FileParser;
use csv::{ByteRecord, ReaderBuilder, StringRecord};
use tracing::warn;

// ==========================================
// CsvRecordParser
// ==========================================
pub struct CsvRecordParser;

impl FileParser for CsvRecordParser {
    fn parse_rows(&self, content: &[u8]) -> Vec<RawRow> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头按普通行读取后再丢弃，保证行号一致
            .flexible(true) // 允许行长度不一致
            .from_reader(content);

        let mut rows = Vec::new();
        let mut record = ByteRecord::new();
        let mut row_number = 0usize;

        loop {
            match reader.read_byte_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    // 内存读取不会出现 IO 错误；结构错误之后无法可靠定位下一行
                    warn!(error = %e, row_number = row_number + 1, "CSV 读取中断");
                    break;
                }
            }

            row_number += 1;
            if row_number == 1 {
                continue;
            }

            let row = match StringRecord::from_byte_record(record.clone()) {
                Ok(fields) => RawRow::new(row_number, fields.iter().map(str::to_string).collect()),
                Err(_) => RawRow::unreadable(row_number),
            };
            rows.push(row);
        }

        rows
    }
}
