//! Catalog core services

pub mod fanout;
pub mod rank;
pub mod recommendations;
pub mod refresher;
pub mod search;
pub mod suggestions;

pub use recommendations::{RecommendationService, parse_seed};
pub use refresher::{RefreshSummary, SuggestionRefresher};
pub use search::SearchService;
pub use suggestions::SuggestionService;
