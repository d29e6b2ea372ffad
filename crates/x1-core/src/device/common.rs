// ── Shared device state ──
//
// Every device variant wraps a `DeviceCore`: the function it was bound
// to, its resolved bindings, the sync engine and the value cache. All
// controller traffic for a device goes through here, with the cache lock
// held for the whole request so results land in request order.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;
use x1_api::{ValueRecord, WireValue};

use super::point::{Bindings, BoundPoint, PointSpec, PointState};
use crate::codec::{self, Value};
use crate::error::CoreError;
use crate::model::{ChannelType, FunctionConfig};
use crate::sync::{PushOutcome, SyncEngine};

pub struct DeviceCore {
    function: Arc<FunctionConfig>,
    bindings: Bindings,
    engine: SyncEngine,
    cache: Mutex<PointCache>,
}

impl std::fmt::Debug for DeviceCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceCore")
            .field("uid", &self.function.uid)
            .field("channel_type", &self.function.channel_type)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

impl DeviceCore {
    pub fn bind(
        function: Arc<FunctionConfig>,
        specs: &[PointSpec],
        engine: SyncEngine,
    ) -> Result<Self, CoreError> {
        let bindings = Bindings::resolve(&function, specs)?;
        Ok(Self {
            function,
            bindings,
            engine,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn uid(&self) -> &str {
        &self.function.uid
    }

    pub fn display_name(&self) -> &str {
        &self.function.display_name
    }

    pub fn channel_type(&self) -> &ChannelType {
        &self.function.channel_type
    }

    pub fn function(&self) -> &Arc<FunctionConfig> {
        &self.function
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn has(&self, name: &str) -> bool {
        self.bindings.has(name)
    }

    // ── Cache ────────────────────────────────────────────────────────

    pub async fn state(&self, name: &str) -> PointState {
        self.cache
            .lock()
            .await
            .get(name)
            .cloned()
            .unwrap_or(PointState::Unknown)
    }

    pub async fn value(&self, name: &str) -> Option<Value> {
        self.state(name).await.value().cloned()
    }

    /// A copy of every cache entry.
    pub async fn states(&self) -> HashMap<&'static str, PointState> {
        self.cache.lock().await.clone()
    }

    pub(crate) async fn bool_value(&self, name: &str) -> Option<bool> {
        self.value(name).await.and_then(|v| v.as_bool())
    }

    pub(crate) async fn f64_value(&self, name: &str) -> Option<f64> {
        self.value(name).await.and_then(|v| v.as_f64())
    }

    pub(crate) async fn text_value(&self, name: &str) -> Option<String> {
        match self.value(name).await {
            Some(Value::Text(s)) => Some(s),
            _ => None,
        }
    }

    // ── Pull ─────────────────────────────────────────────────────────

    /// Read every readable point and rebuild the cache from the answer.
    ///
    /// Write-only points are never requested and stay `Unknown`. A device
    /// without readable points sends nothing. On error the cache is left
    /// as it was.
    pub async fn pull(&self) -> Result<(), CoreError> {
        let mut cache = self.cache.lock().await;
        self.pull_locked(&mut cache).await
    }

    async fn pull_locked(&self, cache: &mut PointCache) -> Result<(), CoreError> {
        let readable: Vec<&BoundPoint> = self.bindings.readable().collect();
        if readable.is_empty() {
            debug!(uid = %self.function.uid, "no readable points, pull skipped");
            return Ok(());
        }

        let uids: Vec<&str> = readable.iter().map(|p| p.uid.as_str()).collect();
        let raw = self.engine.pull(&self.function.uid, &uids).await?;

        let mut fresh = HashMap::with_capacity(readable.len());
        for point in readable {
            let state = match raw.get(&point.uid) {
                Some(wire) => decode_state(point, wire),
                None => PointState::Unknown,
            };
            fresh.insert(point.name, state);
        }
        *cache = fresh;
        Ok(())
    }

    // ── Push ─────────────────────────────────────────────────────────

    pub(crate) fn unsupported(&self, operation: impl Into<String>) -> CoreError {
        CoreError::unsupported(&self.function.uid, operation)
    }

    fn writable(&self, name: &str) -> Result<&BoundPoint, CoreError> {
        let point = self
            .bindings
            .get(name)
            .ok_or_else(|| self.unsupported(format!("write {name}")))?;
        if !point.access.write {
            return Err(self.unsupported(format!("write read-only {name}")));
        }
        Ok(point)
    }

    /// Validate and write one logical point.
    ///
    /// Absent or read-only points and codec failures are rejected before
    /// any request is sent.
    pub async fn push(&self, name: &str, value: &Value) -> Result<(), CoreError> {
        let mut cache = self.cache.lock().await;
        self.push_locked(&mut cache, name, value).await
    }

    async fn push_locked(
        &self,
        cache: &mut PointCache,
        name: &str,
        value: &Value,
    ) -> Result<(), CoreError> {
        let point = self.writable(name)?;
        let wire = codec::encode(value, point.kind)?;

        self.engine.push_one(&point.uid, &wire).await?;
        if point.access.read {
            cache.insert(point.name, pushed_state(point, &wire, value));
        }
        Ok(())
    }

    /// Validate every write, then push them together.
    ///
    /// Nothing is sent unless every write is valid. Each successful write
    /// to a readable point updates its cache entry.
    pub async fn push_many(&self, writes: &[(&str, Value)]) -> Result<PushOutcome, CoreError> {
        let mut prepared = Vec::with_capacity(writes.len());
        for (name, value) in writes {
            let point = self.writable(name)?;
            let wire = codec::encode(value, point.kind)?;
            prepared.push((point, wire, value));
        }

        let records: Vec<ValueRecord> = prepared
            .iter()
            .map(|(point, wire, _)| ValueRecord {
                uid: point.uid.clone(),
                value: wire.clone(),
            })
            .collect();

        let mut cache = self.cache.lock().await;
        let outcome = self.engine.push(&records).await?;
        for ((point, wire, value), result) in prepared.iter().zip(outcome.results()) {
            if result.result.is_ok() && point.access.read {
                cache.insert(point.name, pushed_state(point, wire, value));
            }
        }
        Ok(outcome)
    }

    // ── OnOff helpers shared by switching channels ───────────────────

    pub(crate) async fn set_on(&self, on: bool) -> Result<(), CoreError> {
        self.push(ON_OFF, &Value::Bool(on)).await
    }

    /// Invert the cached OnOff state, pulling first when it is unknown.
    ///
    /// The cache lock is held from the read to the write, so concurrent
    /// toggles on one device alternate.
    pub(crate) async fn toggle(&self) -> Result<bool, CoreError> {
        self.writable(ON_OFF)?;

        let mut cache = self.cache.lock().await;
        let current = match cached_bool(&cache) {
            Some(on) => on,
            None => {
                self.pull_locked(&mut cache).await?;
                cached_bool(&cache).ok_or_else(|| CoreError::ValidationFailed {
                    message: format!("OnOff state of {} is unknown", self.function.uid),
                })?
            }
        };

        self.push_locked(&mut cache, ON_OFF, &Value::Bool(!current))
            .await?;
        Ok(!current)
    }
}

pub(crate) const ON_OFF: &str = "OnOff";

type PointCache = HashMap<&'static str, PointState>;

fn cached_bool(cache: &PointCache) -> Option<bool> {
    cache.get(ON_OFF).and_then(PointState::value).and_then(Value::as_bool)
}

fn decode_state(point: &BoundPoint, wire: &WireValue) -> PointState {
    let raw = wire.to_text();
    match codec::decode(&raw, point.kind) {
        Ok(value) => PointState::Value(value),
        Err(error) => {
            debug!(uid = %point.uid, raw = %raw, error = %error, "undecodable value kept raw");
            PointState::Raw {
                raw: raw.into_owned(),
                error,
            }
        }
    }
}

/// Cache entry after a successful write, normalized the way a pull would
/// decode it.
fn pushed_state(point: &BoundPoint, wire: &WireValue, value: &Value) -> PointState {
    PointState::Value(codec::decode(&wire.to_text(), point.kind).unwrap_or_else(|_| value.clone()))
}
