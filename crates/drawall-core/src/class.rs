//! Runtime type names.
//!
//! Every host object carries a [`ClassName`] naming its exact runtime type.
//! Visualizers are registered per class and exclusions are configured per
//! class, so the name is cloned into cache entries and overlay rows; it is
//! reference counted to keep those clones cheap.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// The exact runtime type of a host object, e.g. `"PointLightComponent"`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ClassName(Arc<str>);

impl ClassName {
    /// Create a class name.
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClassName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<ClassName> for String {
    fn from(name: ClassName) -> Self {
        name.0.to_string()
    }
}

impl Borrow<str> for ClassName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassName({})", self.0)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn set_lookup_by_str() {
        let mut set = BTreeSet::new();
        set.insert(ClassName::new("ArrowComponent"));
        assert!(set.contains("ArrowComponent"));
        assert!(!set.contains("BoxComponent"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let name = ClassName::new("SplineComponent");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"SplineComponent\"");
        let back: ClassName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
