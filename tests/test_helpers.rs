// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、内存 ZIP/TAR 归档、CSV 样例数据
// ==========================================

#![allow(dead_code)]

use prices_ingest::db;
use prices_ingest::domain::IdentifierMode;
use prices_ingest::AppState;
use rusqlite::Connection;
use std::error::Error;
use std::io::{Cursor, Read, Write};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// 标准表头
pub const HEADER: &str = "id,name,category,price,create_date";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 创建基于临时数据库的 AppState
pub fn create_test_state(mode: IdentifierMode) -> (NamedTempFile, AppState) {
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path, mode).expect("Failed to create AppState");
    (temp_file, state)
}

/// 直接统计 prices 表行数（绕过仓储）
pub fn count_rows(db_path: &str) -> i64 {
    let conn = Connection::open(db_path).expect("Failed to open db");
    conn.query_row("SELECT COUNT(*) FROM prices", [], |row| row.get(0))
        .expect("Failed to count rows")
}

/// 拼接 CSV（自动加表头）
pub fn csv_with_header(rows: &[&str]) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    csv
}

/// 构建内存 ZIP 归档
pub fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        for (name, content) in files {
            zip.start_file(*name, SimpleFileOptions::default())
                .expect("Failed to start zip entry");
            zip.write_all(content.as_bytes())
                .expect("Failed to write zip entry");
        }
        zip.finish().expect("Failed to finish zip");
    }
    buf
}

/// 构建内存 ZIP 归档（不压缩，数据原样存放）
pub fn build_stored_zip(files: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, content) in files {
            zip.start_file(*name, options)
                .expect("Failed to start zip entry");
            zip.write_all(content.as_bytes())
                .expect("Failed to write zip entry");
        }
        zip.finish().expect("Failed to finish zip");
    }
    buf
}

/// 构建内存 TAR 归档
pub fn build_tar(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .expect("Failed to append tar entry");
    }
    builder.into_inner().expect("Failed to finish tar")
}

/// 读取 ZIP 中的全部成员（名称, 内容）
pub fn read_zip(archive: &[u8]) -> Vec<(String, String)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).expect("Invalid zip");
    let mut members = Vec::new();
    for idx in 0..zip.len() {
        let mut entry = zip.by_index(idx).expect("Invalid zip entry");
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .expect("Failed to read zip entry");
        members.push((entry.name().to_string(), content));
    }
    members
}

/// 样例数据：3 条有效记录，2 个分类，合计 13.25
pub fn sample_rows() -> Vec<&'static str> {
    vec![
        "1,Apple,Fruit,1.50,2024-01-01",
        "2,Carrot,Vegetable,0.75,2024-01-15",
        "3,Melon,Fruit,11.00,2024-02-01",
    ]
}
