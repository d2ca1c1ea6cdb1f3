//! Workbooks and the per-client file cache
//!
//! A workbook is the persisted result of one comparison: metadata, totals
//! over every row, and the ranked top-N rows. Per-period raw payloads and
//! normalized rows sit next to it in `data_cache/<client>/`.

pub mod builder;
pub mod naming;
pub mod store;

pub use builder::{Workbook, WorkbookBuilder, WorkbookMeta};
pub use naming::{cache_file_name, dump_file_name, slugify, workbook_file_name, CacheStage};
pub use store::{AnalysisCache, CacheMiss};
