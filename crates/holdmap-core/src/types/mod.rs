//! Domain types for portfolio similarity clustering.
//!
//! - [`ProductRecord`]: An enriched traded product
//! - [`AssetHolding`]: A disclosed holding with raw value text
//! - [`ProductEmbedding`] / [`PortfolioEmbedding`]: Vector rows keyed by method
//! - [`EmbeddingMethod`]: Product vectorization strategy

mod embedding;
mod holding;
mod method;
mod product;

pub use embedding::{is_zero_vector, PortfolioEmbedding, PortfolioMetadata, ProductEmbedding};
pub use holding::AssetHolding;
pub use method::EmbeddingMethod;
pub use product::{ProductRecord, ProductRecordBuilder};
