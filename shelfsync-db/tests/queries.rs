use shelfsync_catalog::types::*;
use shelfsync_db::*;

fn setup_db() -> rusqlite::Connection {
    let conn = open_memory().unwrap();
    for (name, slug, active) in [("Арматура", "armatura", true), ("Трубы", "truby", false)] {
        upsert_category(
            &conn,
            &Category {
                slug: slug.to_string(),
                name: name.to_string(),
                image_path: "/assets/img/no-photo.webp".to_string(),
                is_active: active,
                seo_title: None,
                seo_description: None,
            },
        )
        .unwrap();
    }
    for (sku, slug, active) in [("SKU-002", "b", true), ("SKU-001", "a", false)] {
        upsert_product(
            &conn,
            &Product {
                sku: sku.to_string(),
                slug: slug.to_string(),
                category_slug: "armatura".to_string(),
                name: sku.to_string(),
                price: None,
                currency: "RUB".to_string(),
                in_stock: true,
                is_active: active,
                image_path: "/assets/img/no-photo.webp".to_string(),
                content_hash: String::new(),
            },
        )
        .unwrap();
    }
    insert_redirect(
        &conn,
        &NewRedirect {
            entity_type: EntityType::Category,
            entity_key: "Трубы".to_string(),
            old_slug: "pipes".to_string(),
            new_slug: "truby".to_string(),
        },
    )
    .unwrap();
    insert_redirect(
        &conn,
        &NewRedirect {
            entity_type: EntityType::Product,
            entity_key: "SKU-002".to_string(),
            old_slug: "a-2".to_string(),
            new_slug: "b".to_string(),
        },
    )
    .unwrap();
    conn
}

#[test]
fn snapshot_loaders_include_inactive_rows() {
    let conn = setup_db();
    let categories = load_categories(&conn).unwrap();
    assert_eq!(categories.len(), 2);
    assert!(categories.iter().any(|c| !c.is_active));

    let products = load_products(&conn).unwrap();
    let skus: Vec<&str> = products.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(skus, vec!["SKU-001", "SKU-002"]);
}

#[test]
fn redirects_filter_by_entity_type() {
    let conn = setup_db();
    assert_eq!(list_redirects(&conn, None).unwrap().len(), 2);

    let products = list_redirects(&conn, Some(EntityType::Product)).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].entity_key, "SKU-002");

    let categories = list_redirects(&conn, Some(EntityType::Category)).unwrap();
    assert_eq!(categories[0].old_slug, "pipes");
}

#[test]
fn stats_split_active_and_inactive() {
    let conn = setup_db();
    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(stats.categories_active, 1);
    assert_eq!(stats.categories_inactive, 1);
    assert_eq!(stats.products_active, 1);
    assert_eq!(stats.products_inactive, 1);
    assert_eq!(stats.redirects, 2);
    assert_eq!(stats.product_images, 0);
    assert_eq!(stats.import_runs, 0);
}

#[test]
fn import_runs_are_newest_first_and_limited() {
    let conn = setup_db();
    for name in ["one.csv", "two.csv", "three.csv"] {
        insert_import_run(
            &conn,
            &ImportRun {
                id: 0,
                file_name: name.to_string(),
                started_at: String::new(),
                finished_at: String::new(),
                counters: RunCounters::default(),
            },
        )
        .unwrap();
    }
    let runs = list_import_runs(&conn, 2).unwrap();
    let names: Vec<&str> = runs.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, vec!["three.csv", "two.csv"]);
}

#[test]
fn product_images_grouped_by_sku() {
    let conn = setup_db();
    let image = |sku: &str, path: &str, order: i64| ProductImage {
        sku: sku.to_string(),
        file_path: path.to_string(),
        alt: format!("{sku} — image {}", order + 1),
        sort_order: order,
        is_primary: order == 0,
    };
    replace_product_images(
        &conn,
        "SKU-002",
        &[image("SKU-002", "/b1.webp", 0), image("SKU-002", "/b2.webp", 1)],
    )
    .unwrap();
    replace_product_images(&conn, "SKU-001", &[image("SKU-001", "/a1.webp", 0)]).unwrap();

    let map = load_product_images(&conn).unwrap();
    assert_eq!(map.len(), 2);
    let paths: Vec<&str> = map["SKU-002"].iter().map(|i| i.file_path.as_str()).collect();
    assert_eq!(paths, vec!["/b1.webp", "/b2.webp"]);
    assert_eq!(map["SKU-001"][0].alt, "SKU-001 — image 1");
}
