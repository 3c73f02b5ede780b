//! Typed materialization of untyped settings documents
//!
//! The store keeps documents as generic JSON and only crosses into concrete
//! application types at this boundary. Any `serde` type with a `Default`
//! qualifies; the default is what callers observe for a uri that was never
//! written.

use crate::contract::{Document, SettingsError, SettingsUri};
use serde::{de::DeserializeOwned, Serialize};

/// A type that can be read from and written to a settings document
pub trait SettingsType: Default + Send + 'static {
    /// Convert a stored document into `Self`
    fn from_document(uri: &SettingsUri, document: &Document) -> Result<Self, SettingsError>;

    /// Render `self` as a document
    fn to_document(&self, uri: &SettingsUri) -> Result<Document, SettingsError>;
}

impl<T> SettingsType for T
where
    T: Serialize + DeserializeOwned + Default + Send + 'static,
{
    fn from_document(uri: &SettingsUri, document: &Document) -> Result<Self, SettingsError> {
        T::deserialize(document).map_err(|e| conversion_error::<T>(uri, &e))
    }

    fn to_document(&self, uri: &SettingsUri) -> Result<Document, SettingsError> {
        serde_json::to_value(self).map_err(|e| conversion_error::<T>(uri, &e))
    }
}

fn conversion_error<T>(uri: &SettingsUri, error: &serde_json::Error) -> SettingsError {
    SettingsError::Conversion {
        uri: uri.to_string(),
        target: std::any::type_name::<T>().to_string(),
        message: error.to_string(),
    }
}
