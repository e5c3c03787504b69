use wayworn_persist::PersistError;

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("grid facade implements API version {actual}, this build requires {expected}")]
    ApiVersion { expected: u32, actual: u32 },

    #[error(transparent)]
    Persist(#[from] PersistError),
}
