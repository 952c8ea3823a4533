//! Which parameters and levels a caller wants.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mapping from parameter short code to the wanted levels.
///
/// An empty level set selects every level of that parameter. Deserializes
/// from a map of lists, e.g. `{"TMP": ["2 m above ground"], "PRMSL": []}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionRequest {
    parameters: BTreeMap<String, BTreeSet<String>>,
}

impl SelectionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or extends) a parameter. Passing no levels selects all levels.
    pub fn with_parameter<I, S>(mut self, parameter: &str, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters
            .entry(parameter.to_string())
            .or_default()
            .extend(levels.into_iter().map(Into::into));
        self
    }

    /// True if a record with this parameter and level is wanted.
    pub fn includes(&self, parameter: &str, level: &str) -> bool {
        match self.parameters.get(parameter) {
            Some(levels) => levels.is_empty() || levels.contains(level),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Requested parameters with their level sets, in sorted order.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }
}
