use shelfsync_catalog::slug::{
    SlugError, SlugRegistry, base_slug, is_valid_slug, resolve_slug, slugify, transliterate,
};

#[test]
fn transliterates_multi_character_letters() {
    assert_eq!(transliterate("жёлтый"), "zheltyi");
    assert_eq!(transliterate("щука"), "schuka");
    assert_eq!(transliterate("объявление"), "obyavlenie");
    assert_eq!(transliterate("ЮЛЯ"), "yulya");
}

#[test]
fn slugify_product_name() {
    assert_eq!(slugify("Арматура 12мм A500C"), "armatura-12mm-a500c");
    assert_eq!(slugify("Арматура"), "armatura");
    assert_eq!(slugify("armatura-10-a500c"), "armatura-10-a500c");
}

#[test]
fn slugify_collapses_separator_runs() {
    assert_eq!(slugify("Труба  профильная 40х20 / 2мм"), "truba-profilnaya-40h20-2mm");
    assert_eq!(slugify("a__b--c  d"), "a-b-c-d");
    assert_eq!(slugify("---edge---"), "edge");
}

#[test]
fn slugify_drops_unmapped_scripts() {
    assert_eq!(slugify("Café №5"), "caf-5");
    assert_eq!(slugify("日本"), "");
}

#[test]
fn slugify_output_is_always_valid_or_empty() {
    let names = [
        "Арматура 12мм A500C",
        "  leading and trailing  ",
        "UPPER case MiXeD",
        "Лист г/к 2x1250x2500",
        "ъь",
        "100% хлопок!",
        "-",
        "Шпилька М10×1000 (DIN 975)",
    ];
    for name in names {
        let slug = slugify(name);
        assert!(
            slug.is_empty() || is_valid_slug(&slug),
            "{name:?} produced invalid slug {slug:?}"
        );
    }
}

#[test]
fn valid_slug_shape() {
    assert!(is_valid_slug("a"));
    assert!(is_valid_slug("armatura-12mm-a500c"));
    assert!(!is_valid_slug(""));
    assert!(!is_valid_slug("-a"));
    assert!(!is_valid_slug("a-"));
    assert!(!is_valid_slug("a--b"));
    assert!(!is_valid_slug("A"));
}

#[test]
fn empty_source_is_rejected() {
    assert_eq!(
        base_slug("!!!"),
        Err(SlugError::InvalidSlugSource("!!!".to_string()))
    );
    assert!(base_slug("ъ").is_err());
}

#[test]
fn collisions_get_suffixes_in_order() {
    let mut registry = SlugRegistry::new();
    let slugs: Vec<String> = ["SKU-1", "SKU-2", "SKU-3", "SKU-4"]
        .iter()
        .map(|sku| registry.assign("bolt", sku, None))
        .collect();
    assert_eq!(slugs, vec!["bolt", "bolt-2", "bolt-3", "bolt-4"]);
}

#[test]
fn owner_keeps_its_own_slug() {
    let mut registry = SlugRegistry::new();
    registry.reserve("bolt", "SKU-1");
    assert_eq!(registry.assign("bolt", "SKU-1", Some("bolt")), "bolt");
    assert_eq!(registry.assign("bolt", "SKU-2", None), "bolt-2");
}

#[test]
fn suffixed_slug_does_not_drift() {
    let mut registry = SlugRegistry::new();
    registry.reserve("bolt", "SKU-1");
    registry.reserve("bolt-3", "SKU-3");
    // bolt-2 is free, but SKU-3 already holds bolt-3 for the same base.
    assert_eq!(registry.assign("bolt", "SKU-3", Some("bolt-3")), "bolt-3");
}

#[test]
fn reserved_redirect_source_is_not_reassigned() {
    let mut registry = SlugRegistry::new();
    registry.reserve("old-name", "SKU-1");
    registry.reserve("new-name", "SKU-1");
    assert_eq!(registry.assign("old-name", "SKU-2", None), "old-name-2");
}

#[test]
fn resolve_reports_change() {
    let mut registry = SlugRegistry::new();
    registry.reserve("old-name", "SKU-1");

    let same = resolve_slug("Old Name", "SKU-1", Some("old-name"), &mut registry).unwrap();
    assert_eq!(same.slug, "old-name");
    assert!(!same.changed);

    let renamed = resolve_slug("New Name", "SKU-1", Some("old-name"), &mut registry).unwrap();
    assert_eq!(renamed.slug, "new-name");
    assert!(renamed.changed);

    let fresh = resolve_slug("Fresh", "SKU-9", None, &mut registry).unwrap();
    assert!(!fresh.changed);
}

#[test]
fn resolve_propagates_invalid_source() {
    let mut registry = SlugRegistry::new();
    let err = resolve_slug("???", "SKU-1", None, &mut registry).unwrap_err();
    assert!(matches!(err, SlugError::InvalidSlugSource(_)));
    assert!(registry.is_empty());
}
