// ==========================================
// 价格数据导入服务 - 导出查询构建器
// ==========================================
// 职责: 把可选的区间筛选转换为参数化 SQL
// 约束: 所有值都走参数绑定，不拼接到 SQL 文本中
// ==========================================

use crate::domain::price::PriceFilter;
use rusqlite::types::Value;

/// 导出查询的 SELECT 部分
pub const SELECT_PRICES: &str =
    "SELECT id, name, category, price_cents, create_date FROM prices";

/// SQL 查询构建器（流式 API，带参数）
///
/// # 示例
/// ```
/// use prices_ingest::repository::query_filter::PriceQueryBuilder;
/// use rusqlite::types::Value;
///
/// let (sql, params) = PriceQueryBuilder::new("SELECT * FROM prices")
///     .and_if("price_cents >= ", Some(Value::Integer(100)))
///     .and_if("price_cents <= ", None)
///     .order_by("id ASC")
///     .build();
///
/// assert_eq!(sql, "SELECT * FROM prices WHERE price_cents >= ?1 ORDER BY id ASC");
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PriceQueryBuilder {
    select_clause: String,
    where_clauses: Vec<String>,
    params: Vec<Value>,
    order_by_clause: Option<String>,
}

impl PriceQueryBuilder {
    /// 创建新的查询构建器
    pub fn new(select: &str) -> Self {
        Self {
            select_clause: select.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_by_clause: None,
        }
    }

    /// 条件添加 AND 子句
    ///
    /// `predicate` 是不含占位符的左半部分（如 `"create_date >= "`），
    /// 占位符编号由构建器按顺序分配
    pub fn and_if(mut self, predicate: &str, value: Option<Value>) -> Self {
        if let Some(value) = value {
            self.params.push(value);
            self.where_clauses
                .push(format!("{}?{}", predicate, self.params.len()));
        }
        self
    }

    /// 添加 ORDER BY 子句
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by_clause = Some(order.to_string());
        self
    }

    /// 构建最终的 SQL 语句与参数
    pub fn build(self) -> (String, Vec<Value>) {
        let mut sql = self.select_clause;

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(order) = &self.order_by_clause {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        (sql, self.params)
    }
}

/// 由筛选条件构建导出查询（闭区间，按 id 升序）
pub fn build_export_query(filter: &PriceFilter) -> (String, Vec<Value>) {
    PriceQueryBuilder::new(SELECT_PRICES)
        .and_if(
            "create_date >= ",
            filter.start.map(|d| Value::Text(d.to_string())),
        )
        .and_if(
            "create_date <= ",
            filter.end.map(|d| Value::Text(d.to_string())),
        )
        .and_if("price_cents >= ", filter.min_cents().map(Value::Integer))
        .and_if("price_cents <= ", filter.max_cents().map(Value::Integer))
        .order_by("id ASC")
        .build()
}
