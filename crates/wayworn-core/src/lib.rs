pub mod block;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod types;
pub mod wear;

pub use block::BlockCode;
pub use catalog::{ForwardEdge, WearCatalog};
pub use config::TrailConfig;
pub use error::{ProtectionError, WearError};
pub use grid::{BlockMaterial, BreakCause, GridAccess, GRID_API_VERSION};
pub use types::{column_of, column_origin, BlockId, BlockPos, ColumnCoord};
pub use wear::{ClayKind, Fertility, GrassCover, GrassyMedium, TrailWear, WearState};
