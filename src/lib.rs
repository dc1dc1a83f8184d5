pub mod auth;
pub mod error;
pub mod export;
pub mod i18n;
pub mod llm;
pub mod prompt;
pub mod schema;
pub mod session;
pub mod store;
pub mod types;
pub mod view;

pub use auth::AuthService;
pub use error::{Error, GenerationContext, Result};
pub use i18n::Translator;
pub use llm::gemini::GeminiBackend;
pub use llm::{GenerationRequest, GenerationResponse, GenerativeBackend};
pub use prompt::{ReportConfig, ReportRequest};
pub use session::{AppContext, Phase, SectorGate, Session};
pub use store::{FileStore, MemoryStore, ProfileStore};
pub use types::{
    DetailedProductSuggestion, DetailedSectorAnalysis, GenerationMode, Language, PendingAction,
    ProductAnalysis, ProductTrend, ReportFilters, Sector, SubscriptionTier, TrendReport,
    UserProfile,
};
pub use view::{filter_products, sort_products, toggle_sort, SortDirection, SortKey, SortState};
