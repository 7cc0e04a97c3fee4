// Library root: the stats ingestion pipeline.
//
// Reader -> Normalizer -> Parser -> Validator produce a `StatTable`; the
// metric deriver and the sort/filter engine run over it on demand.

pub mod catalog;
pub mod error;
pub mod fetch;
pub mod leaders;
pub mod loader;
pub mod metrics;
pub mod normalize;
pub mod parse;
pub mod record;
pub mod schema;
pub mod validate;
pub mod view;
