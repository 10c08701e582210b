pub mod bulk_import;
pub mod popularity;
pub mod refresh;
pub mod sync;

pub use bulk_import::{
    BulkImportOptions, BulkImportService, ImportSummary, NameResolution, ResolvedName,
};
pub use popularity::{PopularityInputs, PopularityReport, PopularityService, popularity_score};
pub use refresh::{RefreshService, RefreshSummary, ShowFailure};
pub use sync::{ShowSyncReport, SyncError, SyncService};
