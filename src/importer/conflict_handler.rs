// ==========================================
// 价格数据导入服务 - 冲突处理器实现
// ==========================================
// 职责: 批内重复检测（标识模式）
// 说明: 库内重复在写入事务中逐条判定；内容模式不做批内预过滤，
//       同批第二条相同记录会因第一条已在同一事务内插入而被判重
// ==========================================

use crate::domain::price::IngestionBatch;
use crate::domain::types::IdentifierMode;
use crate::importer::price_importer_trait::ConflictHandler as ConflictHandlerTrait;
use std::collections::HashSet;

pub struct ConflictHandler;

impl ConflictHandlerTrait for ConflictHandler {
    /// 剔除批内重复主键（先出现者保留：文件顺序优先，其次行顺序）
    fn dedup_in_batch(&self, batch: IngestionBatch, mode: IdentifierMode) -> (IngestionBatch, usize) {
        if mode == IdentifierMode::Content {
            return (batch, 0);
        }

        let mut seen_ids = HashSet::new();
        let mut duplicates = 0;
        let mut survivors = Vec::with_capacity(batch.len());

        for record in batch {
            match record.identifier {
                Some(id) if !seen_ids.insert(id) => duplicates += 1,
                _ => survivors.push(record),
            }
        }

        (survivors, duplicates)
    }
}
