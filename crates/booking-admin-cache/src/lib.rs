pub mod error;
pub mod invalidation;
pub mod store;
pub mod tag;

pub use error::CacheError;
pub use invalidation::Mutation;
pub use store::{query_key, FetchTicket, QueryCache, DEFAULT_TTL};
pub use tag::{provided_tags, CacheTag, TagId, TagType};
