//! # casview Kernel
//!
//! Turns a resolved authentication assertion into the field model a service
//! validation response is rendered from.
//!
//! Protocol generations are served from one assertion. Each generation is a
//! stage that extends the model produced by the generation before it, so a
//! newer consumer always sees a superset of what an older one sees.
//!
//! ## Architecture
//!
//! ```text
//! Assertion             ← resolved by the authentication pipeline
//!     │
//! build_v1              ← principal
//!     │
//! build_v2              ← + raw attributes, proxy metadata
//!     │
//! build_v3              ← + normalized attributes, trust metadata, credential
//!     │
//! ResponseModel         ← read-only, handed to a WireRenderer
//! ```
//!
//! Assembly is pure and synchronous; nothing here performs I/O.

pub mod assemble;
pub mod assertion;
pub mod error;
pub mod field;
pub mod model;
pub mod normalize;
pub mod policy;
pub mod render;
pub mod stage;
pub mod version;

pub use assemble::assemble_response_model;
pub use assertion::{Assertion, Credential};
pub use error::AssemblyError;
pub use model::{FieldValue, ResponseModel, Scalar, ValueSet};
pub use normalize::normalize_attributes;
pub use policy::{ReservedNameHandling, ValidationPolicy};
pub use render::{JsonRenderer, RenderError, WireRenderer};
pub use version::ProtocolVersion;
