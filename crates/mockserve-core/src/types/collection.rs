//! Collection types.

use serde::{Deserialize, Serialize};

/// Named selection of one variant per route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier for this collection
    pub id: String,
    /// Route references in format `routeId:variantId`, in serving order
    pub routes: Vec<String>,
}

impl Collection {
    pub fn new<I, S>(id: impl Into<String>, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            routes: routes.into_iter().map(Into::into).collect(),
        }
    }
}
