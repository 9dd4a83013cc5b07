use shelfsync_catalog::types::RowErrorKind;
use shelfsync_import::*;

fn read(csv: &str) -> Result<Batch, CsvError> {
    read_batch_from(csv.as_bytes())
}

#[test]
fn reads_required_and_optional_columns() {
    let batch = read(
        "category,category_slug,sku,name,price,in_stock,product_slug
Арматура,,SKU-001,Арматура 12мм A500C,59990,true,
Арматура,,SKU-002,Арматура 10мм,\"41 500,50\",нет,armatura-10-a500c
",
    )
    .unwrap();

    assert_eq!(batch.total_rows, 2);
    assert!(batch.errors.is_empty());
    assert!(batch.warnings.is_empty());

    let first = &batch.rows[0];
    assert_eq!(first.line, 2);
    assert_eq!(first.category, "Арматура");
    assert_eq!(first.category_slug, None);
    assert_eq!(first.price, Some(59990.0));
    assert!(first.in_stock);
    assert_eq!(first.product_slug, None);

    let second = &batch.rows[1];
    assert_eq!(second.line, 3);
    assert_eq!(second.price, Some(41500.5));
    assert!(!second.in_stock);
    assert_eq!(second.product_slug.as_deref(), Some("armatura-10-a500c"));
}

#[test]
fn headers_are_trimmed_case_insensitive_and_bom_tolerant() {
    let batch = read("\u{feff} Category , SKU,NAME \nТрубы,T-1,Труба 20\n").unwrap();
    assert_eq!(batch.rows.len(), 1);
    assert_eq!(batch.rows[0].sku, "T-1");
    assert_eq!(batch.rows[0].category, "Трубы");
}

#[test]
fn missing_required_column_is_fatal() {
    match read("category,name\nТрубы,Труба 20\n") {
        Err(CsvError::MissingColumns(cols)) => assert_eq!(cols, vec!["sku".to_string()]),
        other => panic!("expected missing column error, got {other:?}"),
    }
}

#[test]
fn empty_file_is_fatal() {
    match read("") {
        Err(CsvError::MissingColumns(cols)) => assert_eq!(cols.len(), 3),
        other => panic!("expected missing column error, got {other:?}"),
    }
}

#[test]
fn rows_missing_required_fields_are_skipped() {
    let batch = read(
        "category,sku,name
Трубы,T-1,Труба 20
Трубы,,Труба 25
,T-3,Труба 32
Трубы,T-4,
",
    )
    .unwrap();

    assert_eq!(batch.total_rows, 4);
    assert_eq!(batch.rows.len(), 1);
    let kinds: Vec<(u64, &RowErrorKind)> = batch.errors.iter().map(|e| (e.line, &e.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (3, &RowErrorKind::MissingField("sku")),
            (4, &RowErrorKind::MissingField("category")),
            (5, &RowErrorKind::MissingField("name")),
        ]
    );
    assert_eq!(batch.errors[2].sku.as_deref(), Some("T-4"));
}

#[test]
fn duplicate_sku_keeps_first_row() {
    let batch = read(
        "category,sku,name
Трубы,T-1,Труба 20
Трубы,T-1,Труба 20 (copy)
",
    )
    .unwrap();

    assert_eq!(batch.rows.len(), 1);
    assert_eq!(batch.rows[0].name, "Труба 20");
    assert_eq!(batch.errors.len(), 1);
    assert_eq!(batch.errors[0].kind, RowErrorKind::DuplicateSku);
    assert_eq!(batch.errors[0].line, 3);
}

#[test]
fn bad_price_and_stock_are_warnings() {
    let batch = read(
        "category,sku,name,price,in_stock
Трубы,T-1,Труба 20,-5,
Трубы,T-2,Труба 25,дорого,maybe
",
    )
    .unwrap();

    assert_eq!(batch.rows.len(), 2);
    assert!(batch.errors.is_empty());

    assert_eq!(batch.rows[0].price, None);
    assert!(batch.rows[0].in_stock, "empty in_stock means in stock");
    assert_eq!(batch.rows[1].price, None);
    assert!(!batch.rows[1].in_stock);

    let lines: Vec<u64> = batch.warnings.iter().map(|w| w.line).collect();
    assert_eq!(lines, vec![2, 3, 3]);
}

#[test]
fn blank_records_are_ignored() {
    let batch = read("category,sku,name\n\n,,\nТрубы,T-1,Труба 20\n").unwrap();
    assert_eq!(batch.total_rows, 1);
    assert_eq!(batch.rows.len(), 1);
    assert!(batch.errors.is_empty());
}

#[test]
fn invalid_utf8_record_is_a_row_error() {
    let mut bytes = b"category,sku,name\n".to_vec();
    bytes.extend_from_slice(b"\xff\xfe,T-1,bad\n");
    bytes.extend_from_slice("Трубы,T-2,Труба 25\n".as_bytes());

    let batch = read_batch_from(bytes.as_slice()).unwrap();
    assert_eq!(batch.rows.len(), 1);
    assert_eq!(batch.rows[0].sku, "T-2");
    assert_eq!(batch.errors.len(), 1);
    assert!(matches!(batch.errors[0].kind, RowErrorKind::Malformed(_)));
}

#[test]
fn reads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("batch.csv");
    std::fs::write(&path, "category,sku,name\nТрубы,T-1,Труба 20\n").unwrap();

    let batch = read_batch(&path).unwrap();
    assert_eq!(batch.rows.len(), 1);

    assert!(matches!(
        read_batch(&dir.path().join("missing.csv")),
        Err(CsvError::Io(_))
    ));
}
