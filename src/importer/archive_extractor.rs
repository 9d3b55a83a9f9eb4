// ==========================================
// 价格数据导入服务 - 归档解包器实现
// ==========================================
// 支持: ZIP / TAR（内存中读取）
// 筛选: 基名不以 `._` 开头，且完整路径小写后以 `.csv` 结尾
// ==========================================

use crate::domain::price::ArchiveMember;
use crate::domain::types::ArchiveKind;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::price_importer_trait::ArchiveExtractor;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// 单个 CSV 成员解压后的上限（字节）
///
/// ZIP 的声明长度来自上传者，解压时按此上限截断读取
pub const MAX_MEMBER_BYTES: u64 = 256 * 1024 * 1024;

/// 判断归档成员是否为待导入的 CSV
///
/// macOS 打包时产生的 `._xxx.csv` 资源分叉文件需要排除
pub fn is_csv_member(name: &str) -> bool {
    let base_name = name.rsplit('/').next().unwrap_or(name);
    !base_name.starts_with("._") && name.to_lowercase().ends_with(".csv")
}

// ==========================================
// ZIP 解包
// ==========================================
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &[u8], _kind: ArchiveKind) -> ImportResult<Vec<ArchiveMember>> {
        let mut zip = ZipArchive::new(Cursor::new(archive))?;

        let mut members = Vec::new();
        for idx in 0..zip.len() {
            let mut entry = zip.by_index(idx)?;
            if !entry.is_file() {
                continue;
            }

            let name = entry.name().to_string();
            if !is_csv_member(&name) {
                debug!(member = %name, "跳过非 CSV 成员");
                continue;
            }

            let declared = entry.size();
            if declared > MAX_MEMBER_BYTES {
                return Err(ImportError::ArchiveCorrupt(format!(
                    "ZIP 成员过大: {}（声明 {} 字节，上限 {} 字节）",
                    name, declared, MAX_MEMBER_BYTES
                )));
            }

            // 多读 1 字节用于识别超出声明长度的数据流；读到 EOF 时校验 CRC
            let mut content = Vec::new();
            (&mut entry)
                .take(declared + 1)
                .read_to_end(&mut content)?;

            if content.len() as u64 != declared {
                return Err(ImportError::ArchiveCorrupt(format!(
                    "ZIP 成员长度与声明不符: {}（声明 {} 字节，实际至少 {} 字节）",
                    name,
                    declared,
                    content.len()
                )));
            }

            members.push(ArchiveMember { name, content });
        }

        Ok(members)
    }
}

// ==========================================
// TAR 解包
// ==========================================
pub struct TarExtractor;

impl ArchiveExtractor for TarExtractor {
    fn extract(&self, archive: &[u8], _kind: ArchiveKind) -> ImportResult<Vec<ArchiveMember>> {
        let mut tar = tar::Archive::new(Cursor::new(archive));

        let mut members = Vec::new();
        for entry in tar.entries()? {
            let mut entry = entry?;

            // 只处理普通文件（目录、链接、PAX 头等跳过）
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let name = entry.path()?.to_string_lossy().into_owned();
            if !is_csv_member(&name) {
                debug!(member = %name, "跳过非 CSV 成员");
                continue;
            }

            // 声明长度不可信，不按其预分配；实际读取量受归档自身大小约束
            let declared = entry.size();
            let mut content = Vec::new();
            entry.read_to_end(&mut content)?;

            // 截断的归档不会在读取时报错，需按声明长度核对
            if content.len() as u64 != declared {
                return Err(ImportError::ArchiveCorrupt(format!(
                    "TAR 条目被截断: {}（声明 {} 字节，实际 {} 字节）",
                    name,
                    declared,
                    content.len()
                )));
            }

            members.push(ArchiveMember { name, content });
        }

        Ok(members)
    }
}

// ==========================================
// 通用解包器（按归档类型分派）
// ==========================================
pub struct UniversalArchiveExtractor;

impl ArchiveExtractor for UniversalArchiveExtractor {
    fn extract(&self, archive: &[u8], kind: ArchiveKind) -> ImportResult<Vec<ArchiveMember>> {
        match kind {
            ArchiveKind::Zip => ZipExtractor.extract(archive, kind),
            ArchiveKind::Tar => TarExtractor.extract(archive, kind),
        }
    }
}
