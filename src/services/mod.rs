// Service exports
pub mod catalog;
pub mod embeddings;
pub mod recommendations;
pub mod store;
pub mod supabase;

pub use catalog::{Catalog, CatalogError};
pub use embeddings::{EmbeddingError, EmbeddingProvider, OpenAiEmbeddings};
pub use recommendations::{EmbeddingLimits, RecommendationError, RecommendationService};
pub use store::{HistoryStore, PreferenceStore};
pub use supabase::{SupabaseClient, SupabaseError, SupabaseTables};
