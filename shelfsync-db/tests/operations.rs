use shelfsync_catalog::types::*;
use shelfsync_db::*;

fn test_category(name: &str, slug: &str) -> Category {
    Category {
        slug: slug.to_string(),
        name: name.to_string(),
        image_path: "/assets/img/no-photo.webp".to_string(),
        is_active: true,
        seo_title: None,
        seo_description: None,
    }
}

fn test_product(sku: &str, slug: &str, category_slug: &str) -> Product {
    Product {
        sku: sku.to_string(),
        slug: slug.to_string(),
        category_slug: category_slug.to_string(),
        name: format!("Product {sku}"),
        price: Some(59990.0),
        currency: "RUB".to_string(),
        in_stock: true,
        is_active: true,
        image_path: "/assets/img/no-photo.webp".to_string(),
        content_hash: "abc".to_string(),
    }
}

#[test]
fn upsert_and_find_category() {
    let conn = open_memory().unwrap();
    upsert_category(&conn, &test_category("Арматура", "armatura")).unwrap();

    let found = find_category_by_name(&conn, "Арматура").unwrap().unwrap();
    assert_eq!(found.slug, "armatura");
    assert!(found.is_active);

    assert!(find_category_by_name(&conn, "Трубы").unwrap().is_none());
}

#[test]
fn upsert_category_is_idempotent() {
    let conn = open_memory().unwrap();
    let category = test_category("Арматура", "armatura");
    upsert_category(&conn, &category).unwrap();
    upsert_category(&conn, &category).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn category_slug_change_cascades_to_products() {
    let conn = open_memory().unwrap();
    upsert_category(&conn, &test_category("Арматура", "armatura")).unwrap();
    upsert_product(&conn, &test_product("SKU-001", "bar", "armatura")).unwrap();

    upsert_category(&conn, &test_category("Арматура", "rebar")).unwrap();

    let product = find_product_by_sku(&conn, "SKU-001").unwrap().unwrap();
    assert_eq!(product.category_slug, "rebar");
}

#[test]
fn category_update_preserves_seo_fields() {
    let conn = open_memory().unwrap();
    upsert_category(&conn, &test_category("Арматура", "armatura")).unwrap();
    set_category_seo(&conn, "armatura", Some("Rebar"), Some("Steel rebar")).unwrap();

    let mut updated = test_category("Арматура", "armatura");
    updated.image_path = "/assets/img/categories/armatura.webp".to_string();
    upsert_category(&conn, &updated).unwrap();

    let found = find_category_by_name(&conn, "Арматура").unwrap().unwrap();
    assert_eq!(found.seo_title.as_deref(), Some("Rebar"));
    assert_eq!(found.seo_description.as_deref(), Some("Steel rebar"));
    assert_eq!(found.image_path, "/assets/img/categories/armatura.webp");
}

#[test]
fn set_seo_on_missing_category_fails() {
    let conn = open_memory().unwrap();
    let err = set_category_seo(&conn, "nope", None, None).unwrap_err();
    assert!(matches!(err, OperationError::NotFound { .. }));
}

#[test]
fn deactivate_reports_only_real_transitions() {
    let conn = open_memory().unwrap();
    upsert_category(&conn, &test_category("Арматура", "armatura")).unwrap();
    upsert_product(&conn, &test_product("SKU-001", "bar", "armatura")).unwrap();

    assert!(deactivate_product(&conn, "SKU-001").unwrap());
    assert!(!deactivate_product(&conn, "SKU-001").unwrap());
    assert!(!deactivate_product(&conn, "SKU-404").unwrap());

    assert!(deactivate_category(&conn, "Арматура").unwrap());
    assert!(!deactivate_category(&conn, "Арматура").unwrap());

    let product = find_product_by_sku(&conn, "SKU-001").unwrap().unwrap();
    assert!(!product.is_active);
    assert_eq!(product.slug, "bar");
}

#[test]
fn product_upsert_updates_in_place() {
    let conn = open_memory().unwrap();
    upsert_category(&conn, &test_category("Арматура", "armatura")).unwrap();
    upsert_product(&conn, &test_product("SKU-001", "bar", "armatura")).unwrap();

    let mut changed = test_product("SKU-001", "bar-12", "armatura");
    changed.price = None;
    changed.in_stock = false;
    upsert_product(&conn, &changed).unwrap();

    let products = load_products(&conn).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].slug, "bar-12");
    assert_eq!(products[0].price, None);
    assert!(!products[0].in_stock);
}

#[test]
fn product_requires_existing_category() {
    let conn = open_memory().unwrap();
    let result = upsert_product(&conn, &test_product("SKU-001", "bar", "missing"));
    assert!(result.is_err());
}

#[test]
fn duplicate_product_slug_is_rejected() {
    let conn = open_memory().unwrap();
    upsert_category(&conn, &test_category("Арматура", "armatura")).unwrap();
    upsert_product(&conn, &test_product("SKU-001", "bar", "armatura")).unwrap();
    let result = upsert_product(&conn, &test_product("SKU-002", "bar", "armatura"));
    assert!(result.is_err());
}

#[test]
fn product_images_are_replaced_wholesale() {
    let conn = open_memory().unwrap();
    upsert_category(&conn, &test_category("Арматура", "armatura")).unwrap();
    upsert_product(&conn, &test_product("SKU-001", "bar", "armatura")).unwrap();

    let image = |path: &str, order: i64| ProductImage {
        sku: "SKU-001".to_string(),
        file_path: path.to_string(),
        alt: String::new(),
        sort_order: order,
        is_primary: order == 0,
    };
    replace_product_images(&conn, "SKU-001", &[image("/a.webp", 0), image("/b.webp", 1)])
        .unwrap();
    replace_product_images(&conn, "SKU-001", &[image("/c.webp", 0)]).unwrap();

    let images = images_for_product(&conn, "SKU-001").unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].file_path, "/c.webp");
    assert!(images[0].is_primary);
}

#[test]
fn second_primary_image_is_rejected() {
    let conn = open_memory().unwrap();
    upsert_category(&conn, &test_category("Арматура", "armatura")).unwrap();
    upsert_product(&conn, &test_product("SKU-001", "bar", "armatura")).unwrap();

    let primary = |path: &str| ProductImage {
        sku: "SKU-001".to_string(),
        file_path: path.to_string(),
        alt: String::new(),
        sort_order: 0,
        is_primary: true,
    };
    let result = replace_product_images(&conn, "SKU-001", &[primary("/a.webp"), primary("/b.webp")]);
    assert!(result.is_err());
}

#[test]
fn redirects_are_appended() {
    let conn = open_memory().unwrap();
    let redirect = |old: &str, new: &str| NewRedirect {
        entity_type: EntityType::Product,
        entity_key: "SKU-001".to_string(),
        old_slug: old.to_string(),
        new_slug: new.to_string(),
    };
    let first = insert_redirect(&conn, &redirect("a", "b")).unwrap();
    let second = insert_redirect(&conn, &redirect("b", "c")).unwrap();
    assert!(second > first);

    let all = list_redirects(&conn, None).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!((all[0].old_slug.as_str(), all[0].new_slug.as_str()), ("a", "b"));
    assert_eq!(all[1].entity_type, EntityType::Product);
}

#[test]
fn image_fingerprint_upsert_overwrites() {
    let conn = open_memory().unwrap();
    let fp = |hash: &str| ImageFingerprint {
        output_path: "img/categories/armatura.webp".to_string(),
        source_path: "uploads/categories/armatura.png".to_string(),
        source_hash: hash.to_string(),
    };
    upsert_image_fingerprint(&conn, &fp("111")).unwrap();
    upsert_image_fingerprint(&conn, &fp("222")).unwrap();

    let map = load_image_fingerprints(&conn).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map["img/categories/armatura.webp"].source_hash, "222");
}

#[test]
fn import_run_with_row_errors() {
    let conn = open_memory().unwrap();
    let run = ImportRun {
        id: 0,
        file_name: "batch.csv".to_string(),
        started_at: "2026-01-01T00:00:00Z".to_string(),
        finished_at: "2026-01-01T00:00:05Z".to_string(),
        counters: RunCounters {
            rows_total: 3,
            rows_skipped: 1,
            products_created: 2,
            ..Default::default()
        },
    };
    let run_id = insert_import_run(&conn, &run).unwrap();
    insert_row_errors(
        &conn,
        run_id,
        &[RowError {
            line: 3,
            sku: None,
            kind: RowErrorKind::MissingField("sku"),
        }],
    )
    .unwrap();

    let runs = list_import_runs(&conn, 10).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].counters.products_created, 2);
    assert_eq!(runs[0].counters.rows_skipped, 1);

    let errors = row_errors_for_run(&conn, run_id).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 3);
    assert_eq!(errors[0].code, "missing_field");
    assert_eq!(errors[0].message, "missing required field 'sku'");
}
