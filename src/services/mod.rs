pub mod document_store;
pub mod omdb;
pub mod recommender;
pub mod storage;

// Re-export public types
pub use document_store::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};
pub use omdb::{MovieApi, OmdbClient};
pub use recommender::Recommender;
pub use storage::StorageGateway;
