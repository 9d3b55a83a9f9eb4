// ==========================================
// 价格数据导入服务 - 价格领域模型
// ==========================================
// 职责: 价格记录、批次中间结构、汇总统计、导出筛选条件
// 红线: 不含数据访问逻辑
// ==========================================

use crate::domain::types::IdentifierMode;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 价格小数位（DECIMAL(10,2) 语义）
pub const PRICE_SCALE: u32 = 2;

/// 价格上限（分），DECIMAL(10,2) 可表示的最大值 99999999.99
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;

/// 日期格式（YYYY-MM-DD）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// 价格 / 日期 解析与换算
// ==========================================

/// 解析十进制数（支持普通写法与科学计数法）
///
/// `Decimal::from_str` 会忽略 `_` 分隔符，这里按非法数值处理
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.contains('_') {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// 严格解析 `YYYY-MM-DD`（必须 4-2-2 位数字）
///
/// chrono 的 `%m`/`%d` 接受单位数，这里先做形状检查
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// 价格四舍五入（远离零）到两位小数，并固定 scale=2
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut rounded = price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}

/// 价格 → 分（先按两位小数规整）
///
/// # 返回
/// - None: 超出 i64 表示范围
pub fn price_to_cents(price: Decimal) -> Option<i64> {
    i64::try_from(normalize_price(price).mantissa()).ok()
}

/// 分 → 价格（scale=2）
pub fn cents_to_price(cents: i64) -> Decimal {
    Decimal::new(cents, PRICE_SCALE)
}

/// 筛选边界 → 分
///
/// 下界向上取整、上界向下取整，保证闭区间比较在分粒度上精确
fn bound_to_cents(bound: Decimal, strategy: RoundingStrategy) -> i64 {
    let mut rounded = bound.round_dp_with_strategy(PRICE_SCALE, strategy);
    rounded.rescale(PRICE_SCALE);
    let mantissa = rounded.mantissa();
    i64::try_from(mantissa).unwrap_or(if mantissa > 0 { i64::MAX } else { i64::MIN })
}

// ==========================================
// ArchiveMember - 归档成员
// ==========================================
// 生命周期: 仅存在于单次导入请求内，解析后即丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    pub name: String,     // 归档内完整路径
    pub content: Vec<u8>, // 文件完整内容
}

// ==========================================
// RowLocation - 行来源
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLocation {
    pub file_name: String, // 归档内 CSV 成员路径
    pub row_number: usize, // 文件内行号（表头为第 1 行）
}

// ==========================================
// DedupKey - 去重键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Identifier(i64),
    Content {
        name: String,
        category: String,
        price_cents: i64,
        create_date: NaiveDate,
    },
}

// ==========================================
// ValidatedRecord - 校验通过、尚未落库的记录
// ==========================================
// 用途: IngestionBatch 的元素，由字段校验器产出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    pub identifier: Option<i64>, // 调用方提供的主键（仅标识模式）
    pub name: String,            // 已 TRIM
    pub category: String,        // 已 TRIM
    pub price: Decimal,          // scale=2，> 0
    pub create_date: NaiveDate,
    pub location: RowLocation,
}

impl ValidatedRecord {
    /// 价格（分）
    ///
    /// 校验器已保证价格在 DECIMAL(10,2) 范围内
    pub fn price_cents(&self) -> i64 {
        price_to_cents(self.price).unwrap_or(MAX_PRICE_CENTS)
    }

    /// 按标识模式取去重键
    pub fn dedup_key(&self, mode: IdentifierMode) -> DedupKey {
        match (mode, self.identifier) {
            (IdentifierMode::Identifier, Some(id)) => DedupKey::Identifier(id),
            _ => DedupKey::Content {
                name: self.name.clone(),
                category: self.category.clone(),
                price_cents: self.price_cents(),
                create_date: self.create_date,
            },
        }
    }
}

/// 单次导入请求的批次（有序）
pub type IngestionBatch = Vec<ValidatedRecord>;

// ==========================================
// PriceRecord - 已持久化的价格记录
// ==========================================
// 生命周期: 只增不改不删
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRecord {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub create_date: NaiveDate,
}

// ==========================================
// WriteOutcome - 事务写入结果
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub inserted: usize,   // 新插入行数
    pub duplicates: usize, // 与存储中已有记录重复的行数
}

// ==========================================
// StoreStats - 全库统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total_items: i64,
    pub total_categories: i64,
    pub total_price: Decimal,
}

// ==========================================
// IngestionSummary - 导入汇总（对外 JSON）
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionSummary {
    pub total_count: usize,      // 读取到的数据行（不含表头）
    pub duplicates_count: usize, // 批内重复 + 库内重复
    pub total_items: i64,        // 全库记录数
    pub total_categories: i64,   // 全库分类数
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal, // 全库价格合计
}

impl IngestionSummary {
    pub fn new(total_count: usize, duplicates_count: usize, stats: StoreStats) -> Self {
        Self {
            total_count,
            duplicates_count,
            total_items: stats.total_items,
            total_categories: stats.total_categories,
            total_price: stats.total_price,
        }
    }
}

// ==========================================
// PriceFilter - 导出筛选条件（均为闭区间，可选）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl PriceFilter {
    /// 从原始查询参数解析（空字符串视为未提供）
    pub fn parse(
        start: Option<&str>,
        end: Option<&str>,
        min: Option<&str>,
        max: Option<&str>,
    ) -> Result<Self, String> {
        Ok(Self {
            start: parse_optional(start, "start", parse_iso_date)?,
            end: parse_optional(end, "end", parse_iso_date)?,
            min: parse_optional(min, "min", parse_decimal)?,
            max: parse_optional(max, "max", parse_decimal)?,
        })
    }

    /// 价格下界（分，向上取整）
    pub fn min_cents(&self) -> Option<i64> {
        self.min
            .map(|m| bound_to_cents(m, RoundingStrategy::ToPositiveInfinity))
    }

    /// 价格上界（分，向下取整）
    pub fn max_cents(&self) -> Option<i64> {
        self.max
            .map(|m| bound_to_cents(m, RoundingStrategy::ToNegativeInfinity))
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.min.is_none() && self.max.is_none()
    }
}

fn parse_optional<T>(
    raw: Option<&str>,
    field: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| format!("参数 {} 格式错误: {}", field, value)),
    }
}
