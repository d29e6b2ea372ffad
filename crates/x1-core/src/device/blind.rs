use super::Channel;
use super::common::DeviceCore;
use super::point::{Access, PointSpec};
use crate::codec::{Value, ValueKind};
use crate::error::CoreError;
use crate::model::FunctionConfig;

const STEP_UP_DOWN: &str = "StepUpDown";
const UP_DOWN: &str = "UpDown";
const MOVEMENT: &str = "Movement";
const POSITION: &str = "Position";
const SLAT_POSITION: &str = "SlatPosition";

const POINTS: &[PointSpec] = &[
    PointSpec::required(STEP_UP_DOWN, ValueKind::Binary, Access::WRITE_ONLY)
        .aliases(&["Step-Up-Down"]),
    PointSpec::required(UP_DOWN, ValueKind::Binary, Access::WRITE_ONLY).aliases(&["Up-Down"]),
    PointSpec::optional(MOVEMENT, ValueKind::Binary, Access::READ_ONLY).always_read_only(),
    PointSpec::optional(POSITION, ValueKind::PERCENT, Access::READ_WRITE),
    PointSpec::optional(SLAT_POSITION, ValueKind::PERCENT, Access::READ_WRITE)
        .aliases(&["Slat-Position"]),
];

/// A blind or shutter with position feedback.
///
/// Step and move commands are write-only (`false` = up, `true` = down) and
/// never touch the cache; position and slat position are read/write
/// percentages.
#[derive(Debug)]
pub struct Blind {
    core: DeviceCore,
}

impl Channel for Blind {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        POINTS.to_vec()
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl Blind {
    pub fn has_position(&self) -> bool {
        self.core.has(POSITION)
    }

    pub fn has_slat_position(&self) -> bool {
        self.core.has(SLAT_POSITION)
    }

    pub fn has_movement(&self) -> bool {
        self.core.has(MOVEMENT)
    }

    pub async fn move_up(&self) -> Result<(), CoreError> {
        self.core.push(UP_DOWN, &Value::Bool(false)).await
    }

    pub async fn move_down(&self) -> Result<(), CoreError> {
        self.core.push(UP_DOWN, &Value::Bool(true)).await
    }

    pub async fn step_up(&self) -> Result<(), CoreError> {
        self.core.push(STEP_UP_DOWN, &Value::Bool(false)).await
    }

    pub async fn step_down(&self) -> Result<(), CoreError> {
        self.core.push(STEP_UP_DOWN, &Value::Bool(true)).await
    }

    /// Stop a running movement. A step telegram halts the drive.
    pub async fn stop(&self) -> Result<(), CoreError> {
        self.step_up().await
    }

    pub async fn set_position(&self, percent: f64) -> Result<(), CoreError> {
        self.core.push(POSITION, &Value::Float(percent)).await
    }

    pub async fn set_slat_position(&self, percent: f64) -> Result<(), CoreError> {
        self.core.push(SLAT_POSITION, &Value::Float(percent)).await
    }

    pub async fn position(&self) -> Option<f64> {
        self.core.f64_value(POSITION).await
    }

    pub async fn slat_position(&self) -> Option<f64> {
        self.core.f64_value(SLAT_POSITION).await
    }

    /// Cached Movement state.
    pub async fn is_moving(&self) -> Option<bool> {
        self.core.bool_value(MOVEMENT).await
    }
}
