// Service exports
pub mod remote;
pub mod supabase;

pub use remote::{RemoteScoreError, RemoteScorer};
pub use supabase::{SupabaseClient, SupabaseError, SupabaseTables};
