//! Apply CSV catalog batches to the catalog database.
//!
//! This crate owns the ETL: reading and validating batch files, locating and
//! normalizing images, reconciling the batch against the persisted catalog,
//! and archiving processed files.

pub mod archive;
pub mod csv_reader;
pub mod normalize;
pub mod paths;
pub mod progress;
pub mod resolve;
pub mod sync;
pub mod worker_pool;

pub use archive::{ArchiveError, archive_file, list_inbox};
pub use csv_reader::{Batch, BatchRow, CsvError, RowWarning, read_batch, read_batch_from};
pub use normalize::{ImageError, NormalizeJob, NormalizeOutcome, normalize_image};
pub use paths::{CatalogPaths, OutputImage};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
pub use resolve::{CategoryImageStrategy, CategoryImages, resolve_product_images};
pub use sync::{
    CatalogSnapshot, FailedBatch, InboxOutcome, SyncError, SyncOptions, SyncPlan, SyncReport,
    plan_sync, process_inbox, product_content_hash, sync_batch, sync_file,
};
