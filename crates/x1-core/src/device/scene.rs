// Trigger buttons and scene channels. Everything here is write-only:
// the controller never reports a trigger or scene state back.

use super::Channel;
use super::common::DeviceCore;
use super::point::{Access, PointSpec};
use crate::codec::{SceneIndex, Value, ValueKind};
use crate::error::CoreError;
use crate::model::FunctionConfig;

const TRIGGER: &str = "Trigger";
const SCENE_NUMBER: &str = "SceneNumber";
const LEARN_SCENE: &str = "LearnScene";

const SCENE_NUMBER_POINT: PointSpec =
    PointSpec::required(SCENE_NUMBER, ValueKind::Scene, Access::WRITE_ONLY)
        .aliases(&["Execute", "Scene"]);

// ── Trigger ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Trigger {
    core: DeviceCore,
}

impl Channel for Trigger {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        vec![PointSpec::required(TRIGGER, ValueKind::Binary, Access::WRITE_ONLY)]
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl Trigger {
    /// Send `1`.
    pub async fn press(&self) -> Result<(), CoreError> {
        self.core.push(TRIGGER, &Value::Bool(true)).await
    }

    /// Send `0`.
    pub async fn release(&self) -> Result<(), CoreError> {
        self.core.push(TRIGGER, &Value::Bool(false)).await
    }
}

// ── SceneSet ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SceneSet {
    core: DeviceCore,
}

impl Channel for SceneSet {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        vec![
            SCENE_NUMBER_POINT,
            PointSpec::optional(LEARN_SCENE, ValueKind::Scene, Access::WRITE_ONLY)
                .aliases(&["Teach"]),
        ]
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl SceneSet {
    pub fn can_teach(&self) -> bool {
        self.core.has(LEARN_SCENE)
    }

    /// Recall scene `n`. Nothing is read back.
    pub async fn execute_scene(&self, n: u8) -> Result<(), CoreError> {
        let scene = SceneIndex::new(n)?;
        self.core.push(SCENE_NUMBER, &Value::Scene(scene)).await
    }

    /// Store the current actuator states as scene `n`.
    pub async fn teach_scene(&self, n: u8) -> Result<(), CoreError> {
        if !self.can_teach() {
            return Err(self.core.unsupported("teach scene"));
        }
        let scene = SceneIndex::new(n)?;
        self.core.push(LEARN_SCENE, &Value::Scene(scene)).await
    }
}

// ── SceneControl ─────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SceneControl {
    core: DeviceCore,
}

impl Channel for SceneControl {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        vec![SCENE_NUMBER_POINT]
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl SceneControl {
    pub async fn execute_scene(&self, n: u8) -> Result<(), CoreError> {
        let scene = SceneIndex::new(n)?;
        self.core.push(SCENE_NUMBER, &Value::Scene(scene)).await
    }

    /// Scene control channels cannot learn scenes.
    #[allow(clippy::unused_async)]
    pub async fn teach_scene(&self, _n: u8) -> Result<(), CoreError> {
        Err(self.core.unsupported("teach scene"))
    }
}
