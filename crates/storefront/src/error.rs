//! Unified error handling for the widget engine.
//!
//! Cart operations never fail from the shopper's point of view; these errors
//! cover the operator-facing setup paths (configuration, catalog, storage
//! backends) and rendering.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::store::StoreError;
use crate::widget::ActionParseError;

/// Application-level error type for the storefront widget.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A storage backend failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// An action identifier could not be parsed.
    #[error("Bad action: {0}")]
    Action(#[from] ActionParseError),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorefrontError::from(ActionParseError::Unknown("jump".to_string()));
        assert_eq!(err.to_string(), "Bad action: unknown action 'jump'");

        let err = StorefrontError::from(StoreError::InvalidKey("../x".to_string()));
        assert_eq!(err.to_string(), "Store error: invalid storage key: \"../x\"");
    }
}
