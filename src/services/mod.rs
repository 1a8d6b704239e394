// Service exports
pub mod cache;
pub mod source;
pub mod supabase;

pub use cache::{CacheStats, CachedPoolSource};
pub use source::{CandidatePoolSource, FetchError, ViewerAnswersSource};
pub use supabase::{SupabaseClient, SupabaseTables};
