//! Settings areas: enum-named, namespace-qualified uris
//!
//! An application describes its settings areas as an enum and gets a stable
//! uri per variant, e.g. `MyArea::Proxy` in namespace `"net"` maps to
//! `"net/proxy"`.

use crate::contract::{SettingsError, SettingsUri};
use std::marker::PhantomData;

/// An enum of settings areas
pub trait SettingsArea: Copy + Send + Sync + 'static {
    /// Every variant
    fn all() -> &'static [Self];

    /// Uri segment of this variant
    fn area_name(self) -> &'static str;
}

/// Maps area variants to uris and back
#[derive(Debug, Clone)]
pub struct AreaRegistry<A> {
    namespace: String,
    _areas: PhantomData<A>,
}

impl<A: SettingsArea> AreaRegistry<A> {
    pub fn new(namespace: impl Into<String>) -> Result<Self, SettingsError> {
        let namespace = namespace.into();
        let trimmed = namespace.trim_matches('/');
        if trimmed.trim().is_empty() {
            return Err(SettingsError::InvalidArgument {
                name: "namespace".to_string(),
                reason: "area namespace cannot be empty".to_string(),
            });
        }
        Ok(Self {
            namespace: trimmed.to_string(),
            _areas: PhantomData,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Uri of `area`
    pub fn create_area(&self, area: A) -> SettingsUri {
        SettingsUri::from_parts(&self.namespace, area.area_name())
    }

    /// The area whose uri equals `uri`, ignoring case
    pub fn get_area(&self, uri: &SettingsUri) -> Option<A> {
        A::all()
            .iter()
            .copied()
            .find(|area| self.create_area(*area) == *uri)
    }
}
