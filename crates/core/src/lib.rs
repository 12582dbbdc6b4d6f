pub mod config;
pub mod error;
pub mod image;
pub mod query;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, ProviderError};
pub use image::{ImageSize, compose_image_url, is_valid_poster_url};
pub use query::SearchQuery;
pub use types::{ProviderKind, SearchResultItem, SearchResultSet, ShowDetails, ShowInfo};
