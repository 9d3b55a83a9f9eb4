// ==========================================
// 价格数据导入服务 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 归档类型 (Archive Kind)
// ==========================================
// 上传归档的容器格式；缺省或空字符串按 ZIP 处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveKind {
    #[default]
    Zip,
    Tar,
}

impl ArchiveKind {
    /// 解析可选的归档类型标记（None/空白 → Zip）
    pub fn from_indicator(indicator: Option<&str>) -> Result<Self, String> {
        match indicator.map(str::trim) {
            None | Some("") => Ok(ArchiveKind::Zip),
            Some(raw) => raw.parse(),
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveKind::Zip => write!(f, "zip"),
            ArchiveKind::Tar => write!(f, "tar"),
        }
    }
}

impl FromStr for ArchiveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zip" => Ok(ArchiveKind::Zip),
            "tar" => Ok(ArchiveKind::Tar),
            other => Err(format!("不支持的归档类型: {}（仅支持 zip/tar）", other)),
        }
    }
}

// ==========================================
// 标识模式 (Identifier Mode)
// ==========================================
// 决定去重键与主键来源，进程级配置，不随请求变化
// - Content: 主键由存储分配，按 (name, category, price, create_date) 去重
// - Identifier: 主键由调用方提供（CSV 第一列），按主键去重
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierMode {
    #[default]
    Content,
    Identifier,
}

impl fmt::Display for IdentifierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierMode::Content => write!(f, "content"),
            IdentifierMode::Identifier => write!(f, "identifier"),
        }
    }
}

impl FromStr for IdentifierMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(IdentifierMode::Content),
            "identifier" | "id" => Ok(IdentifierMode::Identifier),
            other => Err(format!(
                "未知的标识模式: {}（可选 content/identifier）",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_kind_defaults_to_zip() {
        assert_eq!(ArchiveKind::from_indicator(None).unwrap(), ArchiveKind::Zip);
        assert_eq!(ArchiveKind::from_indicator(Some("")).unwrap(), ArchiveKind::Zip);
        assert_eq!(ArchiveKind::from_indicator(Some("  ")).unwrap(), ArchiveKind::Zip);
    }

    #[test]
    fn test_archive_kind_case_insensitive() {
        assert_eq!(ArchiveKind::from_indicator(Some("TAR")).unwrap(), ArchiveKind::Tar);
        assert_eq!(ArchiveKind::from_indicator(Some("Zip")).unwrap(), ArchiveKind::Zip);
    }

    #[test]
    fn test_archive_kind_rejects_unknown() {
        assert!(ArchiveKind::from_indicator(Some("rar")).is_err());
    }

    #[test]
    fn test_identifier_mode_parse() {
        assert_eq!("content".parse::<IdentifierMode>().unwrap(), IdentifierMode::Content);
        assert_eq!("Identifier".parse::<IdentifierMode>().unwrap(), IdentifierMode::Identifier);
        assert!("uuid".parse::<IdentifierMode>().is_err());
        assert_eq!(IdentifierMode::Identifier.to_string(), "identifier");
    }
}
