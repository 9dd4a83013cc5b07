//! Catalog synchronization.
//!
//! A batch is applied in four steps:
//!
//! 1. Load a [`CatalogSnapshot`] of everything persisted.
//! 2. Compute a [`SyncPlan`] from the snapshot and the parsed batch. This is
//!    pure: slugs, redirects, and deactivations are decided without I/O.
//! 3. Resolve and normalize images on a worker pool.
//! 4. Apply the whole write-set in one transaction, together with the run log.
//!
//! Readers of the database see either the catalog before the batch or after
//! it, never a mix.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::Connection;
use sha2::{Digest, Sha256};
use shelfsync_catalog::slug::{SlugAssignment, SlugError, SlugRegistry, resolve_slug};
use shelfsync_catalog::types::*;
use shelfsync_db::OperationError;
use thiserror::Error;

use crate::archive::{ArchiveError, archive_file, list_inbox};
use crate::csv_reader::{Batch, BatchRow, CsvError, RowWarning, read_batch};
use crate::normalize::{
    ImageError, NormalizeJob, NormalizeOutcome, NormalizedImage, generate_placeholder,
    normalize_image,
};
use crate::paths::{CatalogPaths, OutputImage};
use crate::progress::ImportProgress;
use crate::resolve::{CategoryImages, resolve_product_images};
use crate::worker_pool::{WorkerPool, default_workers};

/// A failure that rejects the whole batch. Nothing is committed or archived.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Batch rejected: {0}")]
    Csv(#[from] CsvError),
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Placeholder image: {0}")]
    Placeholder(#[from] ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot start image workers: {0}")]
    Runtime(#[source] std::io::Error),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Settings for one sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub paths: CatalogPaths,
    /// Currency stored on every product.
    pub currency: String,
    /// Image worker count; 0 means one per available core.
    pub workers: usize,
    /// Plan and report without touching the database, images, or archive.
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn new(paths: CatalogPaths) -> Self {
        Self {
            paths,
            currency: "RUB".to_string(),
            workers: 0,
            dry_run: false,
        }
    }

    fn worker_count(&self) -> usize {
        if self.workers == 0 {
            default_workers()
        } else {
            self.workers
        }
    }
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub file_name: String,
    /// Run log ID; `None` for dry runs.
    pub run_id: Option<i64>,
    pub dry_run: bool,
    pub counters: RunCounters,
    pub row_errors: Vec<RowError>,
    pub warnings: Vec<RowWarning>,
    pub redirects: Vec<NewRedirect>,
}

// ── Snapshot ────────────────────────────────────────────────────────────────

/// Everything persisted before the batch, loaded once at run start.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    /// Keyed by name.
    pub categories: HashMap<String, Category>,
    /// Keyed by SKU.
    pub products: HashMap<String, Product>,
    /// Keyed by SKU.
    pub product_images: HashMap<String, Vec<ProductImage>>,
    pub redirects: Vec<Redirect>,
    /// Keyed by output path.
    pub fingerprints: HashMap<String, ImageFingerprint>,
}

impl CatalogSnapshot {
    pub fn load(conn: &Connection) -> Result<Self, OperationError> {
        Ok(Self {
            categories: shelfsync_db::load_categories(conn)?
                .into_iter()
                .map(|c| (c.name.clone(), c))
                .collect(),
            products: shelfsync_db::load_products(conn)?
                .into_iter()
                .map(|p| (p.sku.clone(), p))
                .collect(),
            product_images: shelfsync_db::load_product_images(conn)?,
            redirects: shelfsync_db::list_redirects(conn, None)?,
            fingerprints: shelfsync_db::load_image_fingerprints(conn)?,
        })
    }

    /// Slug ownership for one entity type: current slugs first, then every
    /// slug the entity ever redirected from or to.
    pub fn slug_registry(&self, entity_type: EntityType) -> SlugRegistry {
        let mut registry = SlugRegistry::new();
        match entity_type {
            EntityType::Category => {
                for c in self.categories.values() {
                    registry.reserve(c.slug.as_str(), c.name.as_str());
                }
            }
            EntityType::Product => {
                for p in self.products.values() {
                    registry.reserve(p.slug.as_str(), p.sku.as_str());
                }
            }
        }
        for r in self.redirects.iter().filter(|r| r.entity_type == entity_type) {
            registry.reserve(r.old_slug.as_str(), r.entity_key.as_str());
            registry.reserve(r.new_slug.as_str(), r.entity_key.as_str());
        }
        registry
    }
}

// ── Planning ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PlannedCategory {
    pub name: String,
    pub slug: String,
    pub existing: Option<Category>,
}

#[derive(Debug, Clone)]
pub struct PlannedProduct {
    pub row: BatchRow,
    pub slug: String,
    pub category_slug: String,
    pub content_hash: String,
    pub existing: Option<Product>,
}

/// The entity-level write-set for a batch, before images are known.
#[derive(Debug, Default)]
pub struct SyncPlan {
    /// In order of first appearance.
    pub categories: Vec<PlannedCategory>,
    /// In file order.
    pub products: Vec<PlannedProduct>,
    pub redirects: Vec<NewRedirect>,
    /// Names of active categories absent from the batch.
    pub deactivate_categories: Vec<String>,
    /// SKUs of active products absent from the batch.
    pub deactivate_products: Vec<String>,
    /// Reader errors plus slug failures, in line order.
    pub row_errors: Vec<RowError>,
}

/// Compute slugs, redirects, and deactivations for `batch` against `snapshot`.
///
/// Categories keep their persisted slug unless a `category_slug` override
/// (the first non-empty one for that name) yields a different one. Product
/// slugs follow the name or `product_slug` override. Rows whose category or
/// product slug cannot be derived are skipped.
pub fn plan_sync(snapshot: &CatalogSnapshot, batch: &Batch) -> SyncPlan {
    let mut plan = SyncPlan {
        row_errors: batch.errors.clone(),
        ..Default::default()
    };

    // Categories
    let mut overrides: HashMap<&str, &str> = HashMap::new();
    for row in &batch.rows {
        if let Some(slug) = row.category_slug.as_deref() {
            overrides.entry(row.category.as_str()).or_insert(slug);
        }
    }

    let mut category_registry = snapshot.slug_registry(EntityType::Category);
    let mut category_slugs: HashMap<&str, Result<String, SlugError>> = HashMap::new();
    for row in &batch.rows {
        let name = row.category.as_str();
        if category_slugs.contains_key(name) {
            continue;
        }
        let existing = snapshot.categories.get(name);
        let previous = existing.map(|c| c.slug.as_str());
        let assignment = match (overrides.get(name), previous) {
            (None, Some(previous)) => Ok(SlugAssignment {
                slug: previous.to_string(),
                changed: false,
            }),
            (source, _) => resolve_slug(
                source.copied().unwrap_or(name),
                name,
                previous,
                &mut category_registry,
            ),
        };

        let outcome = assignment.map(|assignment| {
            if let (true, Some(previous)) = (assignment.changed, previous) {
                plan.redirects.push(NewRedirect {
                    entity_type: EntityType::Category,
                    entity_key: name.to_string(),
                    old_slug: previous.to_string(),
                    new_slug: assignment.slug.clone(),
                });
            }
            plan.categories.push(PlannedCategory {
                name: name.to_string(),
                slug: assignment.slug.clone(),
                existing: existing.cloned(),
            });
            assignment.slug
        });
        if let Err(e) = &outcome {
            log::warn!("Category {name:?}: {e}");
        }
        category_slugs.insert(name, outcome);
    }

    // Products
    let mut product_registry = snapshot.slug_registry(EntityType::Product);
    for row in &batch.rows {
        let skip = |kind: RowErrorKind| RowError {
            line: row.line,
            sku: Some(row.sku.clone()),
            kind,
        };

        let category_slug = match category_slugs.get(row.category.as_str()) {
            Some(Ok(slug)) => slug.clone(),
            Some(Err(e)) => {
                plan.row_errors.push(skip(e.clone().into()));
                continue;
            }
            None => continue,
        };

        let existing = snapshot.products.get(&row.sku);
        let previous = existing.map(|p| p.slug.as_str());
        let source = row.product_slug.as_deref().unwrap_or(&row.name);
        let assignment = match resolve_slug(source, &row.sku, previous, &mut product_registry) {
            Ok(a) => a,
            Err(e) => {
                log::warn!("Line {}: {e}", row.line);
                plan.row_errors.push(skip(e.into()));
                continue;
            }
        };

        if let (true, Some(previous)) = (assignment.changed, previous) {
            plan.redirects.push(NewRedirect {
                entity_type: EntityType::Product,
                entity_key: row.sku.clone(),
                old_slug: previous.to_string(),
                new_slug: assignment.slug.clone(),
            });
        }
        plan.products.push(PlannedProduct {
            row: row.clone(),
            slug: assignment.slug,
            category_slug,
            content_hash: product_content_hash(row),
            existing: existing.cloned(),
        });
    }

    // Reconciliation
    let present_categories: HashSet<&str> =
        plan.categories.iter().map(|c| c.name.as_str()).collect();
    plan.deactivate_categories = snapshot
        .categories
        .values()
        .filter(|c| c.is_active && !present_categories.contains(c.name.as_str()))
        .map(|c| c.name.clone())
        .collect();
    plan.deactivate_categories.sort();

    let present_products: HashSet<&str> =
        plan.products.iter().map(|p| p.row.sku.as_str()).collect();
    plan.deactivate_products = snapshot
        .products
        .values()
        .filter(|p| p.is_active && !present_products.contains(p.sku.as_str()))
        .map(|p| p.sku.clone())
        .collect();
    plan.deactivate_products.sort();

    plan.row_errors.sort_by_key(|e| e.line);
    plan
}

/// SHA-256 over the row fields that define a product's content.
pub fn product_content_hash(row: &BatchRow) -> String {
    let price = row.price.map(|p| format!("{p:.2}")).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(
        format!(
            "{}|{}|{}|{}|{}",
            row.category, row.sku, row.name, price, row.in_stock
        )
        .as_bytes(),
    );
    format!("{:x}", hasher.finalize())
}

// ── Images ──────────────────────────────────────────────────────────────────

/// Source images chosen for every planned entity.
#[derive(Debug, Default)]
struct ImageSelection {
    /// Category name to its normalized output.
    categories: HashMap<String, OutputImage>,
    /// SKU to its normalized outputs in display order.
    products: HashMap<String, Vec<OutputImage>>,
    /// One job per distinct output file.
    jobs: Vec<NormalizeJob>,
}

fn select_images(plan: &SyncPlan, paths: &CatalogPaths) -> ImageSelection {
    let mut selection = ImageSelection::default();
    let mut outputs = HashSet::new();

    let category_images = CategoryImages::scan(paths);
    for category in &plan.categories {
        let Some(found) = category_images.resolve(&category.name, &category.slug) else {
            log::debug!("No image for category {:?}", category.name);
            continue;
        };
        let output = paths.category_output(&category.slug);
        if outputs.insert(output.file.clone()) {
            selection.jobs.push(NormalizeJob {
                source: found.path,
                output: output.file.clone(),
            });
        }
        selection.categories.insert(category.name.clone(), output);
    }

    for product in &plan.products {
        let sku = product.row.sku.as_str();
        let mut product_outputs = Vec::new();
        for source in resolve_product_images(paths, sku) {
            let Some(stem) = source.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let output = paths.product_output(sku, &stem);
            if !outputs.insert(output.file.clone()) {
                log::warn!(
                    "Skipping {}: another file for {sku} already produces {stem}.webp",
                    source.display()
                );
                continue;
            }
            selection.jobs.push(NormalizeJob {
                source,
                output: output.file.clone(),
            });
            product_outputs.push(output);
        }
        selection.products.insert(sku.to_string(), product_outputs);
    }

    selection
}

/// Results of the image phase.
struct ImageResults {
    placeholder: String,
    /// Output files that exist and are current after this run.
    ready: HashSet<PathBuf>,
    fingerprints: Vec<ImageFingerprint>,
    converted: u64,
    reused: u64,
    failed: u64,
}

impl ImageResults {
    fn public_path_or_placeholder(&self, output: Option<&OutputImage>) -> String {
        match output {
            Some(output) if self.ready.contains(&output.file) => output.public_path.clone(),
            _ => self.placeholder.clone(),
        }
    }

    fn record(&mut self, file: PathBuf, normalized: NormalizedImage) {
        match normalized.outcome {
            NormalizeOutcome::Converted => self.converted += 1,
            NormalizeOutcome::Reused => self.reused += 1,
        }
        self.fingerprints.push(normalized.fingerprint);
        self.ready.insert(file);
    }
}

/// Normalize the placeholder and every selected image.
fn process_images(
    selection: &ImageSelection,
    snapshot: &CatalogSnapshot,
    options: &SyncOptions,
    progress: &dyn ImportProgress,
) -> Result<ImageResults, SyncError> {
    let placeholder = options.paths.placeholder_output();
    let mut results = ImageResults {
        placeholder: placeholder.public_path.clone(),
        ready: HashSet::new(),
        fingerprints: Vec::new(),
        converted: 0,
        reused: 0,
        failed: 0,
    };

    if options.dry_run {
        results
            .ready
            .extend(selection.jobs.iter().map(|j| j.output.clone()));
        return Ok(results);
    }

    prepare_placeholder(&placeholder, snapshot, options, &mut results)?;

    if selection.jobs.is_empty() {
        return Ok(results);
    }

    let total = selection.jobs.len();
    progress.on_phase(&format!("Normalizing {total} image(s)"));
    let items: Vec<(NormalizeJob, Option<ImageFingerprint>)> = selection
        .jobs
        .iter()
        .map(|job| {
            let previous = snapshot
                .fingerprints
                .get(job.output.to_string_lossy().as_ref())
                .cloned();
            (job.clone(), previous)
        })
        .collect();

    let workers = options.worker_count();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .max_blocking_threads(workers)
        .build()
        .map_err(SyncError::Runtime)?;

    let outcomes = runtime.block_on(async {
        let mut pool = WorkerPool::start(workers, items, |(job, previous)| {
            let result = normalize_image(&job, previous.as_ref());
            (job, result)
        });
        let mut outcomes = Vec::with_capacity(total);
        while let Some((job, result)) = pool.recv().await {
            progress.on_image(outcomes.len() + 1, total, &job.source.to_string_lossy());
            outcomes.push((job, result));
        }
        outcomes
    });

    for (job, result) in outcomes {
        match result {
            Ok(normalized) => results.record(job.output, normalized),
            Err(e) => {
                log::warn!("{e}; using placeholder");
                results.failed += 1;
            }
        }
    }
    Ok(results)
}

/// Make sure `img/no-photo.webp` exists, converting `uploads/no-photo.png`
/// when present and generating a plain tile otherwise.
fn prepare_placeholder(
    placeholder: &OutputImage,
    snapshot: &CatalogSnapshot,
    options: &SyncOptions,
    results: &mut ImageResults,
) -> Result<(), SyncError> {
    let source = options.paths.placeholder_source();
    if source.is_file() {
        let job = NormalizeJob {
            source,
            output: placeholder.file.clone(),
        };
        let previous = snapshot
            .fingerprints
            .get(placeholder.file.to_string_lossy().as_ref());
        match normalize_image(&job, previous) {
            Ok(normalized) => {
                results.record(job.output, normalized);
                return Ok(());
            }
            Err(e) => log::warn!("{e}; generating a plain placeholder"),
        }
    }
    generate_placeholder(&placeholder.file)?;
    Ok(())
}

// ── Commit ──────────────────────────────────────────────────────────────────

/// Everything to write for one batch.
#[derive(Debug, Default)]
struct WriteSet {
    categories: Vec<Category>,
    products: Vec<(Product, Vec<ProductImage>)>,
    fingerprints: Vec<ImageFingerprint>,
}

/// Build final rows from the plan and image results, filling the creation
/// and update counters. Entities that would not change are left out.
fn build_write_set(
    plan: &SyncPlan,
    selection: &ImageSelection,
    images: ImageResults,
    snapshot: &CatalogSnapshot,
    currency: &str,
    counters: &mut RunCounters,
) -> WriteSet {
    let mut writes = WriteSet::default();

    for planned in &plan.categories {
        let image_path = images.public_path_or_placeholder(selection.categories.get(&planned.name));
        let category = Category {
            slug: planned.slug.clone(),
            name: planned.name.clone(),
            image_path,
            is_active: true,
            seo_title: planned.existing.as_ref().and_then(|c| c.seo_title.clone()),
            seo_description: planned
                .existing
                .as_ref()
                .and_then(|c| c.seo_description.clone()),
        };
        match &planned.existing {
            None => counters.categories_created += 1,
            Some(existing) if *existing != category => counters.categories_updated += 1,
            Some(_) => continue,
        }
        writes.categories.push(category);
    }

    for planned in &plan.products {
        let row = &planned.row;
        let outputs = selection.products.get(&row.sku);
        let product_images: Vec<ProductImage> = outputs
            .into_iter()
            .flatten()
            .filter(|output| images.ready.contains(&output.file))
            .enumerate()
            .map(|(i, output)| ProductImage {
                sku: row.sku.clone(),
                file_path: output.public_path.clone(),
                alt: format!("{} — image {}", row.name, i + 1),
                sort_order: i as i64,
                is_primary: i == 0,
            })
            .collect();
        let image_path = product_images
            .first()
            .map(|i| i.file_path.clone())
            .unwrap_or_else(|| images.placeholder.clone());

        let product = Product {
            sku: row.sku.clone(),
            slug: planned.slug.clone(),
            category_slug: planned.category_slug.clone(),
            name: row.name.clone(),
            price: row.price,
            currency: currency.to_string(),
            in_stock: row.in_stock,
            is_active: true,
            image_path,
            content_hash: planned.content_hash.clone(),
        };
        let previous_images = snapshot
            .product_images
            .get(&row.sku)
            .map(Vec::as_slice)
            .unwrap_or_default();
        match &planned.existing {
            None => counters.products_created += 1,
            Some(existing) if *existing != product || previous_images != product_images => {
                counters.products_updated += 1
            }
            Some(_) => {
                counters.products_unchanged += 1;
                continue;
            }
        }
        writes.products.push((product, product_images));
    }

    counters.images_converted = images.converted;
    counters.images_reused = images.reused;
    counters.images_failed = images.failed;
    writes.fingerprints = images.fingerprints;
    writes
}

/// Apply the write-set, deactivations, and run log in one transaction.
fn commit(
    conn: &Connection,
    plan: &SyncPlan,
    writes: &WriteSet,
    run: &mut ImportRun,
) -> Result<i64, SyncError> {
    let tx = conn.unchecked_transaction()?;

    for category in &writes.categories {
        shelfsync_db::upsert_category(&tx, category)?;
    }
    for (product, images) in &writes.products {
        shelfsync_db::upsert_product(&tx, product)?;
        shelfsync_db::replace_product_images(&tx, &product.sku, images)?;
    }
    for redirect in &plan.redirects {
        shelfsync_db::insert_redirect(&tx, redirect)?;
    }
    for sku in &plan.deactivate_products {
        if shelfsync_db::deactivate_product(&tx, sku)? {
            run.counters.products_deactivated += 1;
        }
    }
    for name in &plan.deactivate_categories {
        if shelfsync_db::deactivate_category(&tx, name)? {
            run.counters.categories_deactivated += 1;
        }
    }
    for fingerprint in &writes.fingerprints {
        shelfsync_db::upsert_image_fingerprint(&tx, fingerprint)?;
    }

    run.finished_at = Utc::now().to_rfc3339();
    let run_id = shelfsync_db::insert_import_run(&tx, run)?;
    shelfsync_db::insert_row_errors(&tx, run_id, &plan.row_errors)?;

    tx.commit()?;
    Ok(run_id)
}

// ── Entry Points ────────────────────────────────────────────────────────────

/// Read and apply one CSV file. The file itself is not moved.
pub fn sync_file(
    conn: &Connection,
    csv_path: &Path,
    options: &SyncOptions,
    progress: &dyn ImportProgress,
) -> Result<SyncReport, SyncError> {
    let file_name = csv_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| csv_path.display().to_string());
    progress.on_phase(&format!("Reading {file_name}"));
    let batch = read_batch(csv_path)?;
    sync_batch(conn, batch, &file_name, options, progress)
}

/// Apply a parsed batch to the catalog.
pub fn sync_batch(
    conn: &Connection,
    batch: Batch,
    file_name: &str,
    options: &SyncOptions,
    progress: &dyn ImportProgress,
) -> Result<SyncReport, SyncError> {
    let started_at = Utc::now().to_rfc3339();

    progress.on_phase("Loading catalog snapshot");
    let snapshot = CatalogSnapshot::load(conn)?;

    progress.on_phase(&format!(
        "Planning {} row(s) from {file_name}",
        batch.rows.len()
    ));
    let plan = plan_sync(&snapshot, &batch);

    let selection = select_images(&plan, &options.paths);
    let images = process_images(&selection, &snapshot, options, progress)?;

    let mut counters = RunCounters {
        rows_total: batch.total_rows,
        rows_skipped: plan.row_errors.len() as u64,
        redirects_created: plan.redirects.len() as u64,
        ..Default::default()
    };
    let writes = build_write_set(
        &plan,
        &selection,
        images,
        &snapshot,
        &options.currency,
        &mut counters,
    );

    let run_id = if options.dry_run {
        counters.products_deactivated = plan.deactivate_products.len() as u64;
        counters.categories_deactivated = plan.deactivate_categories.len() as u64;
        None
    } else {
        progress.on_phase("Committing");
        let mut run = ImportRun {
            id: 0,
            file_name: file_name.to_string(),
            started_at,
            finished_at: String::new(),
            counters,
        };
        let run_id = commit(conn, &plan, &writes, &mut run)?;
        counters = run.counters;
        Some(run_id)
    };

    let report = SyncReport {
        file_name: file_name.to_string(),
        run_id,
        dry_run: options.dry_run,
        counters,
        row_errors: plan.row_errors,
        warnings: batch.warnings,
        redirects: plan.redirects,
    };
    progress.on_complete(&summary_line(&report));
    Ok(report)
}

fn summary_line(report: &SyncReport) -> String {
    let c = &report.counters;
    format!(
        "{}: {} row(s), {} skipped; products +{} ~{} ={} -{}; categories +{} ~{} -{}; {} redirect(s); images {} converted, {} reused, {} failed",
        report.file_name,
        c.rows_total,
        c.rows_skipped,
        c.products_created,
        c.products_updated,
        c.products_unchanged,
        c.products_deactivated,
        c.categories_created,
        c.categories_updated,
        c.categories_deactivated,
        c.redirects_created,
        c.images_converted,
        c.images_reused,
        c.images_failed,
    )
}

/// A batch that stopped inbox processing.
#[derive(Debug)]
pub struct FailedBatch {
    pub file: PathBuf,
    pub error: SyncError,
}

/// Result of draining the inbox.
#[derive(Debug, Default)]
pub struct InboxOutcome {
    /// Reports of batches applied before any failure, in processing order.
    pub reports: Vec<SyncReport>,
    /// The batch that failed, if any. Later files were left untouched.
    pub failed: Option<FailedBatch>,
}

/// Apply every CSV in the inbox in file-name order, archiving each one
/// after its commit. Stops at the first batch that fails.
pub fn process_inbox(
    conn: &Connection,
    options: &SyncOptions,
    progress: &dyn ImportProgress,
) -> Result<InboxOutcome, SyncError> {
    let files = list_inbox(&options.paths.inbox_dir)?;
    if files.is_empty() {
        log::info!("Inbox {} is empty", options.paths.inbox_dir.display());
    }

    let mut outcome = InboxOutcome::default();
    for file in files {
        let result = sync_file(conn, &file, options, progress).and_then(|report| {
            if !options.dry_run {
                archive_file(&file, &options.paths.archive_dir)?;
            }
            Ok(report)
        });
        match result {
            Ok(report) => outcome.reports.push(report),
            Err(error) => {
                log::error!("{}: {error}", file.display());
                outcome.failed = Some(FailedBatch { file, error });
                break;
            }
        }
    }
    Ok(outcome)
}
