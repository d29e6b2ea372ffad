// ── Device registry ──
//
// Instantiates a device for every function of a configuration snapshot.
// Functions that cannot be bound are skipped with a warning and listed in
// `skipped()`; the registry is usable with whatever did bind.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::device::Device;
use crate::error::CoreError;
use crate::model::ConfigurationSnapshot;
use crate::sync::SyncEngine;

/// Why a function has no device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No device variant for this channel type.
    UnsupportedChannel(String),
    /// A required logical data point is absent.
    MissingDataPoint(String),
}

/// A function the registry could not bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFunction {
    pub uid: String,
    pub display_name: String,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub struct Registry {
    snapshot: Arc<ConfigurationSnapshot>,
    /// In configuration order.
    devices: Vec<Arc<Device>>,
    by_uid: HashMap<String, usize>,
    skipped: Vec<SkippedFunction>,
    built_at: DateTime<Utc>,
}

impl Registry {
    /// Bind every function of `snapshot`, each device pulling and pushing
    /// through `engine`.
    pub fn build(snapshot: Arc<ConfigurationSnapshot>, engine: &SyncEngine) -> Self {
        let mut devices = Vec::with_capacity(snapshot.functions.len());
        let mut by_uid = HashMap::with_capacity(snapshot.functions.len());
        let mut skipped = Vec::new();

        for function in &snapshot.functions {
            let reason = if function.channel_type.is_supported() {
                match Device::bind(Arc::clone(function), engine.clone()) {
                    Ok(device) => {
                        by_uid.insert(function.uid.clone(), devices.len());
                        devices.push(Arc::new(device));
                        continue;
                    }
                    Err(CoreError::MissingRequiredDataPoint { point, .. }) => {
                        SkipReason::MissingDataPoint(point)
                    }
                    Err(_) => SkipReason::UnsupportedChannel(function.channel_type.to_string()),
                }
            } else {
                SkipReason::UnsupportedChannel(function.channel_type.to_string())
            };

            warn!(
                uid = %function.uid,
                name = %function.display_name,
                reason = ?reason,
                "function skipped"
            );
            skipped.push(SkippedFunction {
                uid: function.uid.clone(),
                display_name: function.display_name.clone(),
                reason,
            });
        }

        debug!(
            config = %snapshot.uid,
            devices = devices.len(),
            skipped = skipped.len(),
            "registry built"
        );

        Self {
            snapshot,
            devices,
            by_uid,
            skipped,
            built_at: Utc::now(),
        }
    }

    pub fn snapshot(&self) -> &Arc<ConfigurationSnapshot> {
        &self.snapshot
    }

    /// Configuration revision the devices were built from.
    pub fn config_uid(&self) -> &str {
        &self.snapshot.uid
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn skipped(&self) -> &[SkippedFunction] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Devices in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Device>> {
        self.devices.iter()
    }

    pub fn get(&self, uid: &str) -> Option<&Arc<Device>> {
        self.by_uid.get(uid).map(|&i| &self.devices[i])
    }

    /// Look a device up by uid or display name. The uid wins when both are
    /// given; giving neither is a validation error.
    pub fn find(
        &self,
        display_name: Option<&str>,
        uid: Option<&str>,
    ) -> Result<&Arc<Device>, CoreError> {
        match (uid, display_name) {
            (Some(uid), _) => self.get(uid).ok_or_else(|| CoreError::NotFound {
                identifier: uid.to_owned(),
            }),
            (None, Some(name)) => self
                .devices
                .iter()
                .find(|d| d.display_name() == name)
                .ok_or_else(|| CoreError::NotFound {
                    identifier: name.to_owned(),
                }),
            (None, None) => Err(CoreError::ValidationFailed {
                message: "find needs a display name or a uid".into(),
            }),
        }
    }

    /// Devices placed in the named location or any location nested in it.
    pub fn devices_in_location(&self, display_name: &str) -> Vec<&Arc<Device>> {
        self.snapshot
            .location(display_name)
            .map(|l| self.resolve(l.all_function_uids()))
            .unwrap_or_default()
    }

    /// Devices assigned to the named trade.
    pub fn devices_in_trade(&self, display_name: &str) -> Vec<&Arc<Device>> {
        self.snapshot
            .trade(display_name)
            .map(|t| self.resolve(t.function_uids.iter().map(String::as_str)))
            .unwrap_or_default()
    }

    fn resolve<'a>(&'a self, uids: impl IntoIterator<Item = &'a str>) -> Vec<&'a Arc<Device>> {
        uids.into_iter().filter_map(|uid| self.get(uid)).collect()
    }

    /// Pull every device concurrently. Returns one result per device, in
    /// configuration order.
    pub async fn pull_all(&self) -> Vec<(String, Result<(), CoreError>)> {
        let futs = self.devices.iter().map(|device| async move {
            let result = device.pull().await;
            if let Err(e) = &result {
                warn!(uid = %device.uid(), error = %e, "pull failed");
            }
            (device.uid().to_owned(), result)
        });
        futures_util::future::join_all(futs).await
    }
}
