use thiserror::Error;

use crate::block::BlockCode;
use crate::types::BlockPos;

/// Caller-visible reasons a protection request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtectionError {
    #[error("Cannot trample protect block, it's already protected!")]
    AlreadyProtected,

    #[error("Block is not trample protected.")]
    NotProtected,

    #[error("This block can not be trample protected!")]
    NotProtectable,

    #[error("Selection too large ({volume} blocks). Limit is {limit}.")]
    SelectionTooLarge { volume: u64, limit: u64 },
}

impl ProtectionError {
    /// Stable reason code for in-game error messages.
    pub fn code(&self) -> &'static str {
        match self {
            ProtectionError::AlreadyProtected => "alreadytrampleprotected",
            ProtectionError::NotProtected => "nottrampleprotected",
            ProtectionError::NotProtectable => "nottrampleprotectable",
            ProtectionError::SelectionTooLarge { .. } => "selectiontoolarge",
        }
    }
}

/// Content-integrity failures while rewriting a wear block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WearError {
    #[error("no block registered for code {code} (needed at {pos})")]
    MissingBlock { code: BlockCode, pos: BlockPos },

    #[error("block at {0} has no registered code")]
    UnknownBlockCode(BlockPos),
}
