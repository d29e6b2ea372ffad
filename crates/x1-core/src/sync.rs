// ── Value synchronization engine ──
//
// Moves raw values between devices and the controller. A pull is one
// `GET api/values/{function}` filtered to the requested uids; a push is
// one or more writes whose individual results are reported in order.
// Nothing is retried.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};
use x1_api::{ValueRecord, WireValue};

use crate::error::CoreError;
use crate::session::Session;

/// How a push of several values reaches the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// One `PUT api/values/{uid}` per value, in order.
    #[default]
    Individual,
    /// A single `PUT api/v2/values`. Not atomic on the controller.
    Bulk,
}

// ── PushOutcome ──────────────────────────────────────────────────────

/// Result of one write within a push.
#[derive(Debug)]
pub struct WriteResult {
    pub uid: String,
    pub result: Result<(), CoreError>,
}

/// Per-write results of a push, in submission order.
#[derive(Debug, Default)]
pub struct PushOutcome {
    results: Vec<WriteResult>,
}

impl PushOutcome {
    pub fn results(&self) -> &[WriteResult] {
        &self.results
    }

    /// Every write succeeded (vacuously true for an empty push).
    pub fn is_complete(&self) -> bool {
        self.results.iter().all(|r| r.result.is_ok())
    }

    /// Some writes succeeded and some failed.
    pub fn is_partial(&self) -> bool {
        let failed = self.failed_uids().len();
        failed > 0 && failed < self.results.len()
    }

    pub fn succeeded_uids(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.result.is_ok())
            .map(|r| r.uid.as_str())
            .collect()
    }

    pub fn failed_uids(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.result.is_err())
            .map(|r| r.uid.as_str())
            .collect()
    }
}

// ── SyncEngine ───────────────────────────────────────────────────────

/// Pull/push through one session. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    session: Arc<Session>,
    mode: WriteMode,
}

impl SyncEngine {
    pub fn new(session: Arc<Session>, mode: WriteMode) -> Self {
        Self { session, mode }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn write_mode(&self) -> WriteMode {
        self.mode
    }

    /// Read the current values of `uids`, all belonging to `function_uid`.
    ///
    /// Uids the controller did not report are absent from the result. An
    /// empty request issues no call.
    pub async fn pull(
        &self,
        function_uid: &str,
        uids: &[&str],
    ) -> Result<HashMap<String, WireValue>, CoreError> {
        if uids.is_empty() {
            return Ok(HashMap::new());
        }

        let wanted: HashSet<&str> = uids.iter().copied().collect();
        let records = self
            .session
            .client()
            .get_values(self.session.token(), function_uid)
            .await?;

        let values: HashMap<String, WireValue> = records
            .into_iter()
            .filter(|r| wanted.contains(r.uid.as_str()))
            .map(|r| (r.uid, r.value))
            .collect();
        debug!(
            function = function_uid,
            requested = uids.len(),
            received = values.len(),
            "pulled values"
        );
        Ok(values)
    }

    /// Write one value. An empty success body is the normal answer.
    pub async fn push_one(&self, uid: &str, value: &WireValue) -> Result<(), CoreError> {
        self.session
            .client()
            .put_value(self.session.token(), uid, value)
            .await?;
        Ok(())
    }

    /// Write several values and report each write's result.
    ///
    /// In bulk mode a failed request fails the whole push; per-uid errors in
    /// a successful answer mark those writes failed.
    pub async fn push(&self, writes: &[ValueRecord]) -> Result<PushOutcome, CoreError> {
        let results = match (writes, self.mode) {
            ([], _) => Vec::new(),
            ([single], _) => vec![WriteResult {
                uid: single.uid.clone(),
                result: self.push_one(&single.uid, &single.value).await,
            }],
            (_, WriteMode::Individual) => self.push_individually(writes).await,
            (_, WriteMode::Bulk) => self.push_bulk(writes).await?,
        };

        let outcome = PushOutcome { results };
        for failed in &outcome.results {
            if let Err(e) = &failed.result {
                warn!(uid = %failed.uid, error = %e, "write failed");
            }
        }
        Ok(outcome)
    }

    /// Sequential writes. A rejected token stops the run; the writes not
    /// yet sent fail with the same `Unauthorized`.
    async fn push_individually(&self, writes: &[ValueRecord]) -> Vec<WriteResult> {
        let mut results = Vec::with_capacity(writes.len());
        let mut unauthorized: Option<String> = None;
        for write in writes {
            let result = match &unauthorized {
                Some(message) => Err(CoreError::Unauthorized {
                    message: message.clone(),
                }),
                None => self.push_one(&write.uid, &write.value).await,
            };
            if let Err(CoreError::Unauthorized { message }) = &result {
                if unauthorized.is_none() {
                    debug!(uid = %write.uid, "token rejected, remaining writes skipped");
                    unauthorized = Some(message.clone());
                }
            }
            results.push(WriteResult {
                uid: write.uid.clone(),
                result,
            });
        }
        results
    }

    async fn push_bulk(&self, writes: &[ValueRecord]) -> Result<Vec<WriteResult>, CoreError> {
        let statuses = self
            .session
            .client()
            .put_values(self.session.token(), writes)
            .await?;

        let rejected: HashMap<String, String> = statuses
            .into_iter()
            .filter_map(|s| s.error.map(|e| (s.uid, e.to_string())))
            .collect();

        Ok(writes
            .iter()
            .map(|w| WriteResult {
                uid: w.uid.clone(),
                result: match rejected.get(&w.uid) {
                    Some(message) => Err(CoreError::WriteRejected {
                        uid: w.uid.clone(),
                        message: message.clone(),
                    }),
                    None => Ok(()),
                },
            })
            .collect())
    }
}
