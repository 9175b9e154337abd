// Service exports
pub mod applications;
pub mod github;
pub mod jobs;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod supabase;

pub use applications::ApplicationService;
pub use github::{ActivityMode, GithubClient, GithubError, ProfileFetcher, RepositoryLookup};
pub use jobs::JobService;
pub use memory::MemoryStore;
pub use postgres::{PostgresClient, PostgresError};
pub use store::{ApplicationFilter, JobFilter, RecordStore, StoreError};
pub use supabase::{SupabaseClient, SupabaseError, SupabaseTables};
