use super::Channel;
use super::common::DeviceCore;
use super::point::{Access, PointSpec};
use crate::codec::{Value, ValueKind};
use crate::error::CoreError;
use crate::model::FunctionConfig;

const ACTIVE_STATE: &str = "ActiveState";

/// Camera and Link channels. `ActiveState` shows or hides the tile in the
/// controller's UI; it does not switch the underlying device.
#[derive(Debug)]
pub struct Visibility {
    core: DeviceCore,
}

impl Channel for Visibility {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        vec![PointSpec::required(ACTIVE_STATE, ValueKind::Binary, Access::READ_WRITE)]
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl Visibility {
    pub async fn set_active(&self, active: bool) -> Result<(), CoreError> {
        self.core.push(ACTIVE_STATE, &Value::Bool(active)).await
    }

    pub async fn is_active(&self) -> Option<bool> {
        self.core.bool_value(ACTIVE_STATE).await
    }
}
