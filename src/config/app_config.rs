// ==========================================
// 价格数据导入服务 - 进程配置
// ==========================================
// 来源: 环境变量（启动时读取一次，.env 由 main 预先加载）
// 约束: 非法取值视为启动错误
// ==========================================

use crate::domain::types::IdentifierMode;
use crate::logging::LogFormat;
use anyhow::Context;
use std::path::PathBuf;

/// 数据库路径
pub const ENV_DB_PATH: &str = "PRICES_DB_PATH";
/// 监听地址
pub const ENV_BIND_ADDR: &str = "PRICES_BIND_ADDR";
/// 标识模式（content / identifier）
pub const ENV_ID_MODE: &str = "PRICES_ID_MODE";
/// 上传大小上限（MB）
pub const ENV_MAX_UPLOAD_MB: &str = "PRICES_MAX_UPLOAD_MB";
/// 日志格式（pretty / json）
pub const ENV_LOG_FORMAT: &str = "PRICES_LOG_FORMAT";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 64;

/// 进程配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite 数据库文件
    pub db_path: String,

    /// HTTP 监听地址
    pub bind_addr: String,

    /// 去重标识模式
    pub id_mode: IdentifierMode,

    /// 请求体大小上限（字节）
    pub max_upload_bytes: usize,

    /// 日志输出格式
    pub log_format: LogFormat,
}

impl AppConfig {
    /// 从进程环境变量加载
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载（空白值视为未设置）
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_path = get(ENV_DB_PATH).unwrap_or_else(get_default_db_path);
        let bind_addr = get(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let id_mode = match get(ENV_ID_MODE) {
            Some(raw) => raw
                .parse::<IdentifierMode>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("{} 配置错误", ENV_ID_MODE))?,
            None => IdentifierMode::default(),
        };

        let max_upload_mb = match get(ENV_MAX_UPLOAD_MB) {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|mb| *mb > 0)
                .with_context(|| format!("{} 必须是正整数，实际: {}", ENV_MAX_UPLOAD_MB, raw))?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("{} 配置错误", ENV_LOG_FORMAT))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            db_path,
            bind_addr,
            id_mode,
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            log_format,
        })
    }
}

/// 默认数据库路径
///
/// 优先使用用户数据目录，拿不到时回退到当前目录
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from("./prices.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("prices-ingest");
        // 确保目录存在
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("prices.db");
        }
    }

    path.to_string_lossy().to_string()
}
