use super::common::{DeviceCore, ON_OFF};
use super::point::{Access, PointSpec};
use super::Channel;
use crate::codec::ValueKind;
use crate::error::CoreError;
use crate::model::FunctionConfig;

const POINTS: &[PointSpec] = &[PointSpec::required(ON_OFF, ValueKind::Binary, Access::READ_WRITE)];

/// A plain on/off actuator.
#[derive(Debug)]
pub struct Switch {
    core: DeviceCore,
}

impl Channel for Switch {
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

impl Switch {
    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.core.set_on(true).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.core.set_on(false).await
    }

    /// Invert the current state and return the new one.
    pub async fn toggle(&self) -> Result<bool, CoreError> {
        self.core.toggle().await
    }

    /// Cached OnOff state.
    pub async fn is_on(&self) -> Option<bool> {
        self.core.bool_value(ON_OFF).await
    }
}
