//! Model artifact persistence.
//!
//! A fitted [`RiskPipeline`](crate::pipeline::RiskPipeline) serializes to a
//! single binary file: a magic + format-version header followed by a
//! Postcard-encoded, version-tagged payload. See [`save`] and [`load`].

mod codec;
mod payload;

pub use codec::{
    default_candidates, load, locate, save, LoadError, SaveError, FORMAT_VERSION_MAJOR,
    FORMAT_VERSION_MINOR, MAGIC,
};
pub use payload::{ForestPayload, MalformedPayload, Payload, PayloadV1, TreePayload};
