// ── Device taxonomy ──
//
// One variant per supported channel type. Every variant is bound from a
// `FunctionConfig` through the same `Channel` contract and keeps its
// state in a `DeviceCore`. `Device` is the closed set the registry hands
// out; match on it to reach the typed operations.

pub mod audio;
pub mod blind;
pub mod climate;
pub mod common;
pub mod dimmer;
pub mod point;
pub mod scene;
pub mod switch;
pub mod value;
pub mod visibility;

use std::sync::Arc;

use crate::error::CoreError;
use crate::model::{ChannelType, FunctionConfig};
use crate::sync::SyncEngine;

pub use self::audio::{Audio, SonosAudio};
pub use self::blind::Blind;
pub use self::climate::{FanCoil, HeatingCooling, RoomTemperature};
pub use self::common::DeviceCore;
pub use self::dimmer::{Dimmer, DimmerRgbw, DimmerWhite, Rgbw};
pub use self::point::{Access, Bindings, BoundPoint, PointSpec, PointState};
pub use self::scene::{SceneControl, SceneSet, Trigger};
pub use self::switch::Switch;
pub use self::value::ValueDevice;
pub use self::visibility::Visibility;

/// The contract every channel variant implements.
pub trait Channel: Sized {
    /// Logical data points this channel understands for `function`.
    fn points(function: &FunctionConfig) -> Vec<PointSpec>;

    fn from_core(core: DeviceCore) -> Self;

    fn core(&self) -> &DeviceCore;

    /// Resolve the channel's points against `function`.
    fn bind(function: Arc<FunctionConfig>, engine: SyncEngine) -> Result<Self, CoreError> {
        let points = Self::points(&function);
        DeviceCore::bind(function, &points, engine).map(Self::from_core)
    }
}

/// A bound device of any supported channel type.
#[derive(Debug)]
pub enum Device {
    Switch(Switch),
    Dimmer(Dimmer),
    DimmerRgbw(DimmerRgbw),
    DimmerWhite(DimmerWhite),
    Blind(Blind),
    Trigger(Trigger),
    SceneSet(SceneSet),
    SceneControl(SceneControl),
    RoomTemperature(RoomTemperature),
    HeatingCooling(HeatingCooling),
    FanCoil(FanCoil),
    Audio(Audio),
    SonosAudio(SonosAudio),
    Camera(Visibility),
    Link(Visibility),
    Value(ValueDevice),
}

impl Device {
    /// Bind `function` to the variant its channel type selects.
    ///
    /// Unsupported channel types fail with `UnsupportedOperation`; missing
    /// required points with `MissingRequiredDataPoint`.
    pub fn bind(function: Arc<FunctionConfig>, engine: SyncEngine) -> Result<Self, CoreError> {
        let channel = function.channel_type.clone();
        match channel {
            ChannelType::Switch => Switch::bind(function, engine).map(Self::Switch),
            ChannelType::Dimmer => Dimmer::bind(function, engine).map(Self::Dimmer),
            ChannelType::DimmerRgbw => DimmerRgbw::bind(function, engine).map(Self::DimmerRgbw),
            ChannelType::DimmerWhite => DimmerWhite::bind(function, engine).map(Self::DimmerWhite),
            ChannelType::BlindWithPos => Blind::bind(function, engine).map(Self::Blind),
            ChannelType::Trigger => Trigger::bind(function, engine).map(Self::Trigger),
            ChannelType::SceneSet => SceneSet::bind(function, engine).map(Self::SceneSet),
            ChannelType::SceneControl => {
                SceneControl::bind(function, engine).map(Self::SceneControl)
            }
            ChannelType::RoomTemperatureSwitchable => {
                RoomTemperature::bind(function, engine).map(Self::RoomTemperature)
            }
            ChannelType::HeatingCoolingSwitchable => {
                HeatingCooling::bind(function, engine).map(Self::HeatingCooling)
            }
            ChannelType::FanCoil => FanCoil::bind(function, engine).map(Self::FanCoil),
            ChannelType::AudioWithPlaylist => Audio::bind(function, engine).map(Self::Audio),
            ChannelType::SonosAudio => SonosAudio::bind(function, engine).map(Self::SonosAudio),
            ChannelType::Camera => Visibility::bind(function, engine).map(Self::Camera),
            ChannelType::Link => Visibility::bind(function, engine).map(Self::Link),
            ChannelType::Binary
            | ChannelType::Byte
            | ChannelType::DWord
            | ChannelType::Integer
            | ChannelType::Float
            | ChannelType::String
            | ChannelType::Percent
            | ChannelType::Temperature => ValueDevice::bind(function, engine).map(Self::Value),
            ChannelType::Unsupported(name) => Err(CoreError::unsupported(
                &function.uid,
                format!("bind channel type {name}"),
            )),
        }
    }

    pub fn core(&self) -> &DeviceCore {
        match self {
            Self::Switch(d) => d.core(),
            Self::Dimmer(d) => d.core(),
            Self::DimmerRgbw(d) => d.core(),
            Self::DimmerWhite(d) => d.core(),
            Self::Blind(d) => d.core(),
            Self::Trigger(d) => d.core(),
            Self::SceneSet(d) => d.core(),
            Self::SceneControl(d) => d.core(),
            Self::RoomTemperature(d) => d.core(),
            Self::HeatingCooling(d) => d.core(),
            Self::FanCoil(d) => d.core(),
            Self::Audio(d) => d.core(),
            Self::SonosAudio(d) => d.core(),
            Self::Camera(d) | Self::Link(d) => d.core(),
            Self::Value(d) => d.core(),
        }
    }

    pub fn uid(&self) -> &str {
        self.core().uid()
    }

    pub fn display_name(&self) -> &str {
        self.core().display_name()
    }

    pub fn channel_type(&self) -> &ChannelType {
        self.core().channel_type()
    }

    /// Refresh the cache from the controller.
    pub async fn pull(&self) -> Result<(), CoreError> {
        self.core().pull().await
    }

    /// The audio capability of plain and Sonos audio zones.
    pub fn as_audio(&self) -> Option<&Audio> {
        match self {
            Self::Audio(a) => Some(a),
            Self::SonosAudio(s) => Some(s.audio()),
            _ => None,
        }
    }
}
