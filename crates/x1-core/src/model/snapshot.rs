use std::sync::Arc;

use serde::Serialize;

use super::function::FunctionConfig;
use super::location::{Location, Trade};

/// One revision of the controller's configuration.
///
/// `uid` identifies the revision: once the controller reports a different
/// uid, every cached device built from this snapshot is stale.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConfigurationSnapshot {
    pub uid: String,
    /// In document order.
    pub functions: Vec<Arc<FunctionConfig>>,
    pub locations: Vec<Location>,
    pub trades: Vec<Trade>,
}

impl ConfigurationSnapshot {
    pub fn function(&self, uid: &str) -> Option<&Arc<FunctionConfig>> {
        self.functions.iter().find(|f| f.uid == uid)
    }

    /// `true` when `current_uid` names a different configuration revision.
    pub fn is_stale(&self, current_uid: &str) -> bool {
        self.uid != current_uid
    }

    pub fn location(&self, display_name: &str) -> Option<&Location> {
        self.locations.iter().find_map(|l| l.find(display_name))
    }

    pub fn trade(&self, display_name: &str) -> Option<&Trade> {
        self.trades.iter().find(|t| t.display_name == display_name)
    }
}
