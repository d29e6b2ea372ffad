use super::Channel;
use super::common::DeviceCore;
use super::point::{Access, PointSpec};
use crate::codec::{Value, ValueKind};
use crate::error::CoreError;
use crate::model::{ChannelType, FunctionConfig};

const VALUE: &str = "Value";

/// Generic single-value channels (Binary, Byte, DWord, Integer, Float,
/// String, Percent, Temperature). The channel type picks the codec.
#[derive(Debug)]
pub struct ValueDevice {
    core: DeviceCore,
    kind: ValueKind,
}

/// Codec for a value channel type; `None` for every other channel.
pub fn value_kind(channel: &ChannelType) -> Option<ValueKind> {
    Some(match channel {
        ChannelType::Binary => ValueKind::Binary,
        ChannelType::Byte => ValueKind::Byte,
        ChannelType::DWord => ValueKind::DWord,
        ChannelType::Integer => ValueKind::Integer,
        ChannelType::Float => ValueKind::Float(None),
        ChannelType::String => ValueKind::Text,
        ChannelType::Percent => ValueKind::PERCENT,
        ChannelType::Temperature => ValueKind::Temperature,
        _ => return None,
    })
}

impl Channel for ValueDevice {
    fn points(function: &FunctionConfig) -> Vec<PointSpec> {
        let kind = value_kind(&function.channel_type).unwrap_or(ValueKind::Text);
        vec![PointSpec::required(VALUE, kind, Access::READ_WRITE)]
    }

    fn from_core(core: DeviceCore) -> Self {
        let kind = value_kind(core.channel_type()).unwrap_or(ValueKind::Text);
        Self { core, kind }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl ValueDevice {
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub async fn set(&self, value: &Value) -> Result<(), CoreError> {
        self.core.push(VALUE, value).await
    }

    pub async fn value(&self) -> Option<Value> {
        self.core.value(VALUE).await
    }
}
