// ==========================================
// 价格数据导入服务 - 行级中间结构
// ==========================================
// 职责: 解析后的原始行、行校验结果、拒绝原因
// 说明: 拒绝是值而不是错误，只影响计数，不中止文件或批次
// ==========================================

use crate::domain::price::ValidatedRecord;
use std::fmt;

// ==========================================
// RawRow - CSV 原始行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub row_number: usize, // 文件内行号（表头为第 1 行）
    pub fields: Option<Vec<String>>, // None 表示该行不是合法 UTF-8
}

impl RawRow {
    pub fn new(row_number: usize, fields: Vec<String>) -> Self {
        Self {
            row_number,
            fields: Some(fields),
        }
    }

    pub fn unreadable(row_number: usize) -> Self {
        Self {
            row_number,
            fields: None,
        }
    }
}

// ==========================================
// RejectReason - 行拒绝原因
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    TooFewColumns,
    InvalidIdentifier,
    InvalidPrice,
    NonPositivePrice,
    PriceOutOfRange,
    InvalidDate,
    BlankName,
    BlankCategory,
    TextTooLong,
    UnreadableRow,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::TooFewColumns => "列数不足",
            RejectReason::InvalidIdentifier => "主键不是正整数",
            RejectReason::InvalidPrice => "价格格式错误",
            RejectReason::NonPositivePrice => "价格必须大于 0",
            RejectReason::PriceOutOfRange => "价格超出 DECIMAL(10,2) 范围",
            RejectReason::InvalidDate => "日期格式错误（期望 YYYY-MM-DD）",
            RejectReason::BlankName => "名称为空",
            RejectReason::BlankCategory => "分类为空",
            RejectReason::TextTooLong => "文本超过 255 字符",
            RejectReason::UnreadableRow => "行内容不是合法 UTF-8",
        };
        write!(f, "{}", text)
    }
}

// ==========================================
// RowOutcome - 单行校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Accepted(ValidatedRecord),
    Rejected(RejectReason),
}
