//! Token lineage model: seeds, identities, persisted rotation state, and the wire codec.

pub mod id;
pub mod seed;
pub mod state;
pub mod wire;

pub use id::*;
pub use seed::*;
pub use state::*;
pub use wire::*;
