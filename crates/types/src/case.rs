//! Case-management enums.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Case priority values accepted by the case update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CasePriority {
    PriorityUnspecified,
    PriorityInfo,
    PriorityLow,
    PriorityMedium,
    PriorityHigh,
    PriorityCritical,
}

impl CasePriority {
    pub fn as_str(self) -> &'static str {
        match self {
            CasePriority::PriorityUnspecified => "PriorityUnspecified",
            CasePriority::PriorityInfo => "PriorityInfo",
            CasePriority::PriorityLow => "PriorityLow",
            CasePriority::PriorityMedium => "PriorityMedium",
            CasePriority::PriorityHigh => "PriorityHigh",
            CasePriority::PriorityCritical => "PriorityCritical",
        }
    }
}

impl fmt::Display for CasePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
