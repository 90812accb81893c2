//! Command implementations.

pub mod claims;
pub mod extract;
pub mod history;
pub mod ingest;
pub mod query;
pub mod reindex;
pub mod verdict;

pub use self::claims::execute_claims;
pub use self::extract::execute_extract;
pub use self::history::execute_history;
pub use self::ingest::execute_ingest;
pub use self::query::execute_query;
pub use self::reindex::execute_reindex;
pub use self::verdict::execute_verdict;
