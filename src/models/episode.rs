use serde::{Deserialize, Serialize};

/// A locally tracked episode, keyed by the external catalog episode id.
///
/// `show_id` is a plain reference to the owning show's external id, not an
/// ownership pointer. `airdate` and `airtime` hold the `"TBA"` sentinel
/// while the catalog has not announced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: i32,
    pub show_id: i32,
    pub season: i32,
    pub number: i32,
    pub name: String,
    pub airdate: String,
    pub airtime: String,
    pub runtime: Option<i32>,
    pub watched: bool,
}
