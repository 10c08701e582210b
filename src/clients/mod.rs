pub mod tvmaze;

pub use tvmaze::{
    CatalogCastCredit, CatalogClient, CatalogEpisode, CatalogError, CatalogImage, CatalogRating,
    CatalogSearchHit, CatalogShow, TvMazeClient,
};
