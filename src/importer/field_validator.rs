// ==========================================
// 价格数据导入服务 - 字段校验器实现
// ==========================================
// 列布局: id,name,category,price,create_date（与导出一致）
// 规则: 检查按顺序执行，第一个失败的检查决定拒绝原因
// 约束: 拒绝只是计数，不记录逐行日志
// ==========================================

use crate::domain::price::{
    normalize_price, parse_decimal, parse_iso_date, price_to_cents, RowLocation,
    ValidatedRecord, MAX_PRICE_CENTS,
};
use crate::domain::row::{RawRow, RejectReason, RowOutcome};
use crate::domain::types::IdentifierMode;
use crate::importer::price_importer_trait::FieldValidator;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// 最少列数
pub const MIN_COLUMNS: usize = 5;

/// 文本字段最大长度（字符）
pub const MAX_TEXT_CHARS: usize = 255;

const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_CATEGORY: usize = 2;
const COL_PRICE: usize = 3;
const COL_DATE: usize = 4;

type Check = fn(&[String], IdentifierMode) -> Result<(), RejectReason>;

/// 校验链（顺序即优先级）
const CHECKS: [Check; 6] = [
    check_column_count,
    check_identifier,
    check_price,
    check_date,
    check_name,
    check_category,
];

// ==========================================
// 单字段解析（校验与构造共用）
// ==========================================

fn parse_identifier(raw: &str) -> Result<i64, RejectReason> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(RejectReason::InvalidIdentifier),
    }
}

fn parse_price(raw: &str) -> Result<Decimal, RejectReason> {
    let value = parse_decimal(raw.trim()).ok_or(RejectReason::InvalidPrice)?;
    let rounded = normalize_price(value);
    if rounded <= Decimal::ZERO {
        return Err(RejectReason::NonPositivePrice);
    }
    match price_to_cents(rounded) {
        Some(cents) if cents <= MAX_PRICE_CENTS => Ok(rounded),
        _ => Err(RejectReason::PriceOutOfRange),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, RejectReason> {
    parse_iso_date(raw.trim()).ok_or(RejectReason::InvalidDate)
}

fn parse_text(raw: &str, blank: RejectReason) -> Result<String, RejectReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(blank);
    }
    if trimmed.chars().count() > MAX_TEXT_CHARS {
        return Err(RejectReason::TextTooLong);
    }
    Ok(trimmed.to_string())
}

// ==========================================
// 校验链中的检查
// ==========================================

fn check_column_count(fields: &[String], _mode: IdentifierMode) -> Result<(), RejectReason> {
    if fields.len() < MIN_COLUMNS {
        return Err(RejectReason::TooFewColumns);
    }
    Ok(())
}

fn check_identifier(fields: &[String], mode: IdentifierMode) -> Result<(), RejectReason> {
    match mode {
        IdentifierMode::Identifier => parse_identifier(&fields[COL_ID]).map(|_| ()),
        IdentifierMode::Content => Ok(()),
    }
}

fn check_price(fields: &[String], _mode: IdentifierMode) -> Result<(), RejectReason> {
    parse_price(&fields[COL_PRICE]).map(|_| ())
}

fn check_date(fields: &[String], _mode: IdentifierMode) -> Result<(), RejectReason> {
    parse_date(&fields[COL_DATE]).map(|_| ())
}

fn check_name(fields: &[String], _mode: IdentifierMode) -> Result<(), RejectReason> {
    parse_text(&fields[COL_NAME], RejectReason::BlankName).map(|_| ())
}

fn check_category(fields: &[String], _mode: IdentifierMode) -> Result<(), RejectReason> {
    parse_text(&fields[COL_CATEGORY], RejectReason::BlankCategory).map(|_| ())
}

// ==========================================
// PriceFieldValidator
// ==========================================
pub struct PriceFieldValidator {
    mode: IdentifierMode,
}

impl PriceFieldValidator {
    pub fn new(mode: IdentifierMode) -> Self {
        Self { mode }
    }

    fn build_record(
        &self,
        fields: &[String],
        location: RowLocation,
    ) -> Result<ValidatedRecord, RejectReason> {
        CHECKS
            .iter()
            .try_for_each(|check| check(fields, self.mode))?;

        let identifier = match self.mode {
            IdentifierMode::Identifier => Some(parse_identifier(&fields[COL_ID])?),
            IdentifierMode::Content => None,
        };

        Ok(ValidatedRecord {
            identifier,
            name: parse_text(&fields[COL_NAME], RejectReason::BlankName)?,
            category: parse_text(&fields[COL_CATEGORY], RejectReason::BlankCategory)?,
            price: parse_price(&fields[COL_PRICE])?,
            create_date: parse_date(&fields[COL_DATE])?,
            location,
        })
    }
}

impl FieldValidator for PriceFieldValidator {
    fn validate(&self, row: &RawRow, file_name: &str) -> RowOutcome {
        let Some(fields) = row.fields.as_deref() else {
            return RowOutcome::Rejected(RejectReason::UnreadableRow);
        };

        let location = RowLocation {
            file_name: file_name.to_string(),
            row_number: row.row_number,
        };

        match self.build_record(fields, location) {
            Ok(record) => RowOutcome::Accepted(record),
            Err(reason) => RowOutcome::Rejected(reason),
        }
    }
}
