pub mod compat;
pub mod compress;
pub mod error;
pub mod format;
pub mod load;
pub mod save;

pub use error::PersistError;
pub use format::{PayloadHeader, PayloadKind, ProtectionEntry, TouchEntry};
pub use load::{load_protections, load_touches, LoadedPayload};
pub use save::{save_protections, save_touches};
