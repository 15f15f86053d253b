mod entity;
mod manifest;
mod record;
pub(crate) mod schema;
pub(crate) mod storage;

pub use entity::{dedup_entities, Entity, EntityKind};
pub use manifest::RunManifest;
pub use record::Record;
pub use schema::ExtractionSchema;
