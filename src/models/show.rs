use serde::{Deserialize, Serialize};

/// A tracked show, keyed by the external catalog id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: i32,
    pub name: String,
    /// The free-text name the show was originally resolved from.
    pub search_name: Option<String>,
    pub image: Option<String>,
    pub status: String,
    pub summary: Option<String>,
    pub genres: Vec<String>,
    pub language: Option<String>,
    pub premiered: Option<String>,
    pub rating: Option<f32>,
    pub network: Option<Network>,
    pub runtime: Option<i32>,
    pub official_site: Option<String>,
    pub cast: Vec<CastMember>,
    /// Derived score, recomputed by the popularity engine and never edited.
    pub popularity: f32,
    /// Legacy per-show ignore flag, superseded by user settings rows.
    pub ignored: bool,
    pub last_synced_at: Option<String>,
}

impl Show {
    /// Effective ignore state for one user. A settings row is authoritative;
    /// the legacy flag only applies when no row exists.
    #[must_use]
    pub fn is_ignored_for(&self, settings: Option<&UserShowSettings>) -> bool {
        settings.map_or(self.ignored, |s| s.ignored)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub person_id: i32,
    pub person_name: String,
    pub character_name: Option<String>,
    pub person_image: Option<String>,
}

/// Per-user override of whether a show counts toward active tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserShowSettings {
    pub user_id: i32,
    pub show_id: i32,
    pub ignored: bool,
}
