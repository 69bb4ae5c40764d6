pub mod anime;
pub mod movies;
pub mod music;
pub mod music_catalog;
pub mod providers;
pub mod query_builder;
pub mod rotation;
pub mod sessions;

pub use anime::AnimeRecommender;
pub use movies::MovieRecommender;
pub use music::MusicRecommender;
pub use music_catalog::MusicCatalog;
pub use sessions::SessionStore;
