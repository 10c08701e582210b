/// Placeholder stored when the catalog has no air date or air time yet.
pub const TBA: &str = "TBA";

pub mod status {

    pub const RUNNING: &str = "Running";

    pub const ENDED: &str = "Ended";

    pub const UNKNOWN: &str = "Unknown";
}

pub mod limits {

    pub const MAX_CAST_MEMBERS: usize = 20;

    pub const MAX_SEARCH_RESULTS: usize = 10;
}

pub mod import {

    pub const DEFAULT_BATCH_SIZE: usize = 20;

    pub const DEFAULT_BATCH_DELAY_SECS: u64 = 5;
}
