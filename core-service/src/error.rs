use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error(transparent)]
    Runtime(#[from] core_runtime::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] core_catalog::CatalogError),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::Catalog(core_catalog::CatalogError::NotFound { .. })
        )
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            CoreError::Catalog(core_catalog::CatalogError::Unavailable { .. })
        )
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CoreError::Catalog(core_catalog::CatalogError::InvalidInput { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
