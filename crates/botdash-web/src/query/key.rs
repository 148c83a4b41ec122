//! Cache keys

use crate::api_client::{Endpoint, Params};
use std::fmt;

/// Identity of one cached result: resource name plus exact request
///
/// Parameter order is part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: &'static str,
    path: String,
    params: Params,
}

impl QueryKey {
    /// Build a key from its parts
    pub fn new(resource: &'static str, path: impl Into<String>, params: Params) -> Self {
        Self {
            resource,
            path: path.into(),
            params,
        }
    }

    /// Resource name
    #[must_use]
    pub const fn resource(&self) -> &'static str {
        self.resource
    }

    /// Request path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request parameters
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }
}

impl From<&Endpoint> for QueryKey {
    fn from(endpoint: &Endpoint) -> Self {
        Self::new(endpoint.resource, endpoint.path.clone(), endpoint.params.clone())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.path)?;
        for (index, (name, value)) in self.params.iter().enumerate() {
            let separator = if index == 0 { '?' } else { '&' };
            write!(f, "{separator}{name}={value}")?;
        }
        Ok(())
    }
}
