// ==========================================
// 导入 API 端到端测试
// ==========================================
// 测试目标: 归档 → 校验 → 去重 → 落库 → 汇总 的完整链路
// ==========================================

mod test_helpers;

use prices_ingest::api::ApiError;
use prices_ingest::domain::{ArchiveKind, IdentifierMode};
use prices_ingest::logging;
use prices_ingest::ImportApi;
use rust_decimal::Decimal;
use test_helpers::*;

#[test]
fn test_zip_with_zero_price_row() {
    logging::init_test();
    let (_temp_file, state) = create_test_state(IdentifierMode::Content);

    let csv = csv_with_header(&[
        "1,Apple,Fruit,1.50,2024-01-01",
        "2,Freebie,Fruit,0,2024-01-01",
        "3,Carrot,Vegetable,0.75,2024-01-15",
    ]);
    let archive = build_zip(&[("data.csv", csv.as_str())]);

    let summary = state
        .import_api
        .import_prices(&archive, ArchiveKind::Zip)
        .expect("导入应当成功");

    assert_eq!(summary.total_count, 3);
    assert_eq!(summary.duplicates_count, 0);
    assert_eq!(summary.total_items, 2);
    assert_eq!(summary.total_categories, 2);
    assert_eq!(summary.total_price, Decimal::new(225, 2));
}

#[test]
fn test_tar_skips_resource_fork_member() {
    logging::init_test();
    let (_temp_file, state) = create_test_state(IdentifierMode::Content);

    let junk = csv_with_header(&["9,Junk,Junk,9.99,2024-01-01"]);
    let csv = csv_with_header(&sample_rows());
    let archive = build_tar(&[("._data.csv", junk.as_str()), ("data.csv", csv.as_str())]);

    let summary = state
        .import_api
        .import_prices(&archive, ArchiveKind::Tar)
        .expect("导入应当成功");

    assert_eq!(summary.total_count, 3);
    assert_eq!(summary.total_items, 3);
    assert_eq!(summary.total_categories, 2);
    assert_eq!(summary.total_price, Decimal::new(1325, 2));
}

#[test]
fn test_all_rows_invalid_leaves_store_unchanged() {
    logging::init_test();
    let (temp_file, state) = create_test_state(IdentifierMode::Content);

    let csv = csv_with_header(&[
        "1,Apple,Fruit,abc,2024-01-01",
        "2,,Fruit,1.00,2024-01-01",
        "3,Pear,Fruit,1.00,01/02/2024",
        "too,short",
    ]);
    let archive = build_zip(&[("data.csv", csv.as_str())]);

    let summary = state
        .import_api
        .import_prices(&archive, ArchiveKind::Zip)
        .unwrap();

    assert_eq!(summary.total_count, 4);
    assert_eq!(summary.duplicates_count, 0);
    assert_eq!(summary.total_items, 0);
    assert_eq!(summary.total_price, Decimal::ZERO);
    assert_eq!(count_rows(temp_file.path().to_str().unwrap()), 0);
}

#[test]
fn test_identical_rows_across_files_content_mode() {
    logging::init_test();
    let (_temp_file, state) = create_test_state(IdentifierMode::Content);

    // 内容相同、id 不同：内容模式下按内容判重
    let first = csv_with_header(&["1,Apple,Fruit,1.50,2024-01-01"]);
    let second = csv_with_header(&["2,Apple,Fruit,1.5,2024-01-01"]);
    let archive = build_zip(&[("a.csv", first.as_str()), ("nested/b.csv", second.as_str())]);

    let summary = state
        .import_api
        .import_prices(&archive, ArchiveKind::Zip)
        .unwrap();

    assert_eq!(summary.total_count, 2);
    assert_eq!(summary.duplicates_count, 1);
    assert_eq!(summary.total_items, 1);
}

#[test]
fn test_identical_ids_across_files_identifier_mode() {
    logging::init_test();
    let (_temp_file, state) = create_test_state(IdentifierMode::Identifier);

    let first = csv_with_header(&["5,Apple,Fruit,1.50,2024-01-01"]);
    let second = csv_with_header(&["5,Banana,Fruit,0.25,2024-03-01", "6,Kiwi,Fruit,0.40,2024-03-01"]);
    let archive = build_zip(&[("a.csv", first.as_str()), ("b.csv", second.as_str())]);

    let summary = state
        .import_api
        .import_prices(&archive, ArchiveKind::Zip)
        .unwrap();

    assert_eq!(summary.total_count, 3);
    assert_eq!(summary.duplicates_count, 1);
    assert_eq!(summary.total_items, 2);
    // 先出现者保留
    assert_eq!(summary.total_price, Decimal::new(190, 2));
}

#[test]
fn test_identifier_mode_rejects_non_numeric_ids() {
    logging::init_test();
    let (_temp_file, state) = create_test_state(IdentifierMode::Identifier);

    let csv = csv_with_header(&["abc,Apple,Fruit,1.50,2024-01-01", "0,Pear,Fruit,1.50,2024-01-01"]);
    let archive = build_zip(&[("data.csv", csv.as_str())]);

    let summary = state
        .import_api
        .import_prices(&archive, ArchiveKind::Zip)
        .unwrap();

    assert_eq!(summary.total_count, 2);
    assert_eq!(summary.total_items, 0);
}

#[test]
fn test_reingest_is_idempotent() {
    logging::init_test();
    let (_temp_file, state) = create_test_state(IdentifierMode::Content);

    let csv = csv_with_header(&sample_rows());
    let archive = build_zip(&[("data.csv", csv.as_str())]);

    let first = state
        .import_api
        .import_prices(&archive, ArchiveKind::Zip)
        .unwrap();
    let second = state
        .import_api
        .import_prices(&archive, ArchiveKind::Zip)
        .unwrap();

    assert_eq!(first.duplicates_count, 0);
    assert_eq!(second.duplicates_count, 3);
    assert_eq!(second.total_items, first.total_items);
    assert_eq!(second.total_price, first.total_price);
}

#[test]
fn test_corrupt_archive_is_rejected() {
    logging::init_test();
    let (temp_file, state) = create_test_state(IdentifierMode::Content);

    let mut archive = build_zip(&[("data.csv", csv_with_header(&sample_rows()).as_str())]);
    archive.truncate(archive.len() / 2);

    let result = state.import_api.import_prices(&archive, ArchiveKind::Zip);

    assert!(matches!(result, Err(ApiError::ArchiveCorrupt(_))));
    assert_eq!(count_rows(temp_file.path().to_str().unwrap()), 0);
}

#[test]
fn test_zip_member_with_damaged_payload_is_rejected() {
    logging::init_test();
    let (temp_file, state) = create_test_state(IdentifierMode::Content);

    let csv = csv_with_header(&sample_rows());
    let mut archive = build_stored_zip(&[("data.csv", csv.as_str())]);
    let offset = archive
        .windows(csv.len())
        .position(|window| window == csv.as_bytes())
        .expect("存储模式下应能找到原始数据");
    // 中央目录完好，仅成员数据的 CRC 不再匹配
    archive[offset + csv.len() / 2] ^= 0xFF;

    let result = state.import_api.import_prices(&archive, ArchiveKind::Zip);

    assert!(matches!(result, Err(ApiError::ArchiveCorrupt(_))));
    assert_eq!(count_rows(temp_file.path().to_str().unwrap()), 0);
}

#[test]
fn test_unknown_archive_kind_is_bad_input() {
    assert!(matches!(
        ImportApi::resolve_kind(Some("rar")),
        Err(ApiError::BadInput(_))
    ));
    assert_eq!(ImportApi::resolve_kind(Some("")).unwrap(), ArchiveKind::Zip);
}

#[test]
fn test_archive_without_csv_members() {
    logging::init_test();
    let (_temp_file, state) = create_test_state(IdentifierMode::Content);

    let archive = build_zip(&[("readme.txt", "nothing here")]);

    let summary = state
        .import_api
        .import_prices(&archive, ArchiveKind::Zip)
        .unwrap();

    assert_eq!(summary.total_count, 0);
    assert_eq!(summary.total_items, 0);
}
