// ==========================================
// 价格数据导入服务 - 价格数据仓储
// ==========================================
// 职责: prices 表的事务写入、全库统计、筛选查询
// 红线: Repository 不含业务规则，校验与批内去重在导入层完成
// 并发: 写事务使用 BEGIN IMMEDIATE，开局即取写锁，多个导入串行执行
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema};
use crate::domain::price::{
    cents_to_price, DedupKey, PriceFilter, PriceRecord, StoreStats, ValidatedRecord, WriteOutcome,
};
use crate::domain::types::IdentifierMode;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::query_filter::build_export_query;
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, Transaction, TransactionBehavior};
use std::sync::{Arc, Mutex};

// ==========================================
// PriceRepository - 价格仓储
// ==========================================
pub struct PriceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PriceRepository {
    /// 打开数据库文件并初始化 schema
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = Connection::open(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        configure_sqlite_connection(&conn)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 单事务写入一批记录
    ///
    /// # 参数
    /// - records: 已通过校验（标识模式下已完成批内去重）的记录，按文件/行顺序
    /// - mode: 标识模式，决定库内判重方式
    ///
    /// # 返回
    /// - Ok(WriteOutcome): 插入数与库内重复数
    /// - Err: 任一读写失败，整个事务回滚，不提交任何记录
    pub fn write_batch(
        &self,
        records: &[ValidatedRecord],
        mode: IdentifierMode,
    ) -> RepositoryResult<WriteOutcome> {
        let conn = self.get_conn()?;
        let tx = Transaction::new_unchecked(&conn, TransactionBehavior::Immediate)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let outcome = Self::write_batch_tx(&tx, records, mode)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(outcome)
    }

    /// 在事务中逐条判重并插入
    fn write_batch_tx(
        tx: &Transaction,
        records: &[ValidatedRecord],
        mode: IdentifierMode,
    ) -> RepositoryResult<WriteOutcome> {
        let mut exists_stmt = tx.prepare(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM prices
                WHERE name = ?1 AND category = ?2 AND price_cents = ?3 AND create_date = ?4
            )
            "#,
        )?;
        let mut insert_content_stmt = tx.prepare(
            r#"
            INSERT INTO prices (name, category, price_cents, create_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )?;
        let mut insert_identified_stmt = tx.prepare(
            r#"
            INSERT INTO prices (id, name, category, price_cents, create_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO NOTHING
            "#,
        )?;

        let mut outcome = WriteOutcome::default();
        for record in records {
            let inserted = match record.dedup_key(mode) {
                DedupKey::Identifier(id) => {
                    // 主键冲突即为库内重复，changes()==0
                    insert_identified_stmt.execute(params![
                        id,
                        record.name,
                        record.category,
                        record.price_cents(),
                        record.create_date.to_string(),
                    ])? > 0
                }
                DedupKey::Content {
                    name,
                    category,
                    price_cents,
                    create_date,
                } => {
                    let date = create_date.to_string();
                    let exists: bool = exists_stmt
                        .query_row(params![name, category, price_cents, date], |row| row.get(0))?;
                    if !exists {
                        insert_content_stmt.execute(params![name, category, price_cents, date])?;
                    }
                    !exists
                }
            };

            if inserted {
                outcome.inserted += 1;
            } else {
                outcome.duplicates += 1;
            }
        }

        Ok(outcome)
    }

    /// 全库统计（记录数、分类数、价格合计）
    pub fn store_stats(&self) -> RepositoryResult<StoreStats> {
        let conn = self.get_conn()?;
        let (total_items, total_categories, total_cents): (i64, i64, i64) = conn.query_row(
            r#"
            SELECT COUNT(*), COUNT(DISTINCT category), COALESCE(SUM(price_cents), 0)
            FROM prices
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(StoreStats {
            total_items,
            total_categories,
            total_price: cents_to_price(total_cents),
        })
    }

    /// 按筛选条件查询（按 id 升序）
    pub fn query_filtered(&self, filter: &PriceFilter) -> RepositoryResult<Vec<PriceRecord>> {
        let (sql, values) = build_export_query(filter);

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok(PriceRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                category: row.get(2)?,
                price: cents_to_price(row.get(3)?),
                create_date: row.get::<_, NaiveDate>(4)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::RowLocation;
    use rust_decimal::Decimal;

    fn repo() -> PriceRepository {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        PriceRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn record(identifier: Option<i64>, name: &str, category: &str, cents: i64, date: &str) -> ValidatedRecord {
        ValidatedRecord {
            identifier,
            name: name.to_string(),
            category: category.to_string(),
            price: Decimal::new(cents, 2),
            create_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            location: RowLocation {
                file_name: "data.csv".to_string(),
                row_number: 2,
            },
        }
    }

    #[test]
    fn test_content_mode_dedups_within_same_transaction() {
        let repo = repo();
        let batch = vec![
            record(None, "Apple", "Fruit", 150, "2024-01-01"),
            record(None, "Apple", "Fruit", 150, "2024-01-01"),
            record(None, "Apple", "Fruit", 151, "2024-01-01"),
        ];

        let outcome = repo.write_batch(&batch, IdentifierMode::Content).unwrap();

        assert_eq!(outcome, WriteOutcome { inserted: 2, duplicates: 1 });
    }

    #[test]
    fn test_identifier_mode_uses_primary_key() {
        let repo = repo();
        repo.write_batch(
            &[record(Some(10), "Apple", "Fruit", 150, "2024-01-01")],
            IdentifierMode::Identifier,
        )
        .unwrap();

        // 相同 id、不同内容 → 重复；不同 id、相同内容 → 插入
        let outcome = repo
            .write_batch(
                &[
                    record(Some(10), "Pear", "Fruit", 200, "2024-02-01"),
                    record(Some(11), "Apple", "Fruit", 150, "2024-01-01"),
                ],
                IdentifierMode::Identifier,
            )
            .unwrap();

        assert_eq!(outcome, WriteOutcome { inserted: 1, duplicates: 1 });
        let stored = repo.query_filtered(&PriceFilter::default()).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id, 10);
        assert_eq!(stored[0].name, "Apple");
    }

    #[test]
    fn test_store_stats() {
        let repo = repo();
        assert_eq!(repo.store_stats().unwrap(), StoreStats::default());

        repo.write_batch(
            &[
                record(None, "Apple", "Fruit", 150, "2024-01-01"),
                record(None, "Carrot", "Veg", 75, "2024-01-02"),
                record(None, "Pear", "Fruit", 225, "2024-01-03"),
            ],
            IdentifierMode::Content,
        )
        .unwrap();

        let stats = repo.store_stats().unwrap();
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.total_categories, 2);
        assert_eq!(stats.total_price, Decimal::new(450, 2));
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let repo = repo();
        // price_cents 违反 CHECK 约束，导致第二条插入失败
        let batch = vec![
            record(None, "Apple", "Fruit", 150, "2024-01-01"),
            record(None, "Broken", "Fruit", 0, "2024-01-01"),
        ];

        let result = repo.write_batch(&batch, IdentifierMode::Content);

        assert!(matches!(result, Err(RepositoryError::CheckConstraintViolation(_))));
        assert_eq!(repo.store_stats().unwrap().total_items, 0);
    }

    #[test]
    fn test_query_filtered_inclusive_bounds() {
        let repo = repo();
        repo.write_batch(
            &[
                record(None, "a", "x", 100, "2024-01-01"),
                record(None, "b", "x", 200, "2024-01-15"),
                record(None, "c", "x", 300, "2024-01-31"),
            ],
            IdentifierMode::Content,
        )
        .unwrap();

        let by_date = PriceFilter::parse(Some("2024-01-01"), Some("2024-01-15"), None, None).unwrap();
        let names: Vec<_> = repo
            .query_filtered(&by_date)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        let by_price = PriceFilter::parse(None, None, Some("2.00"), Some("3")).unwrap();
        let names: Vec<_> = repo
            .query_filtered(&by_price)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }
}
