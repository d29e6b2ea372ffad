use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::data_point::DataPoint;

const CHANNEL_PREFIX: &str = "de.gira.schema.channels.";

// ── ChannelType ──────────────────────────────────────────────────────

/// Controller-declared channel type, the key that selects a device variant.
///
/// Parsed from the dotted resource name (`de.gira.schema.channels.Switch`).
/// Names without a matching variant are kept verbatim in `Unsupported`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelType {
    Switch,
    Dimmer,
    DimmerRgbw,
    DimmerWhite,
    BlindWithPos,
    Trigger,
    SceneSet,
    SceneControl,
    RoomTemperatureSwitchable,
    HeatingCoolingSwitchable,
    FanCoil,
    AudioWithPlaylist,
    SonosAudio,
    Camera,
    Link,
    Binary,
    DWord,
    Integer,
    Float,
    String,
    Byte,
    Percent,
    Temperature,
    Unsupported(String),
}

impl ChannelType {
    pub fn parse(name: &str) -> Self {
        let Some(suffix) = name.strip_prefix(CHANNEL_PREFIX) else {
            return Self::Unsupported(name.to_owned());
        };
        match suffix {
            "Switch" => Self::Switch,
            "KNX.Dimmer" => Self::Dimmer,
            "DimmerRGBW" => Self::DimmerRgbw,
            "DimmerWhite" => Self::DimmerWhite,
            "BlindWithPos" => Self::BlindWithPos,
            "Trigger" => Self::Trigger,
            "SceneSet" => Self::SceneSet,
            "SceneControl" => Self::SceneControl,
            "RoomTemperatureSwitchable" => Self::RoomTemperatureSwitchable,
            "KNX.HeatingCoolingSwitchable" => Self::HeatingCoolingSwitchable,
            "KNX.FanCoil" => Self::FanCoil,
            "AudioWithPlaylist" => Self::AudioWithPlaylist,
            "Sonos.Audio" => Self::SonosAudio,
            "Camera" => Self::Camera,
            "Link" => Self::Link,
            "Binary" => Self::Binary,
            "DWord" => Self::DWord,
            "Integer" => Self::Integer,
            "Float" => Self::Float,
            "String" => Self::String,
            "Byte" => Self::Byte,
            "Percent" => Self::Percent,
            "Temperature" => Self::Temperature,
            _ => Self::Unsupported(name.to_owned()),
        }
    }

    /// The part after `de.gira.schema.channels.`, or the verbatim name for
    /// unsupported types.
    pub fn suffix(&self) -> &str {
        match self {
            Self::Switch => "Switch",
            Self::Dimmer => "KNX.Dimmer",
            Self::DimmerRgbw => "DimmerRGBW",
            Self::DimmerWhite => "DimmerWhite",
            Self::BlindWithPos => "BlindWithPos",
            Self::Trigger => "Trigger",
            Self::SceneSet => "SceneSet",
            Self::SceneControl => "SceneControl",
            Self::RoomTemperatureSwitchable => "RoomTemperatureSwitchable",
            Self::HeatingCoolingSwitchable => "KNX.HeatingCoolingSwitchable",
            Self::FanCoil => "KNX.FanCoil",
            Self::AudioWithPlaylist => "AudioWithPlaylist",
            Self::SonosAudio => "Sonos.Audio",
            Self::Camera => "Camera",
            Self::Link => "Link",
            Self::Binary => "Binary",
            Self::DWord => "DWord",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::String => "String",
            Self::Byte => "Byte",
            Self::Percent => "Percent",
            Self::Temperature => "Temperature",
            Self::Unsupported(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl FromStr for ChannelType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Serialized as the full schema name.
impl Serialize for ChannelType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(name) => f.write_str(name),
            other => write!(f, "{CHANNEL_PREFIX}{}", other.suffix()),
        }
    }
}

// ── FunctionConfig ───────────────────────────────────────────────────

/// A function parameter (`expand=parameters`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub set: Option<String>,
    pub key: String,
    pub value: serde_json::Value,
}

impl Parameter {
    /// Numeric view of the value; the controller sends numbers or numeric strings.
    pub fn as_f64(&self) -> Option<f64> {
        match &self.value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// One configured function (logical device) of the installation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionConfig {
    pub uid: String,
    pub display_name: String,
    pub function_type: String,
    pub channel_type: ChannelType,
    /// In document order; uids are unique within the function.
    pub data_points: Vec<DataPoint>,
    pub parameters: Vec<Parameter>,
}

impl FunctionConfig {
    pub fn data_point(&self, name: &str) -> Option<&DataPoint> {
        self.data_points.iter().find(|dp| dp.name == name)
    }

    pub fn data_point_by_uid(&self, uid: &str) -> Option<&DataPoint> {
        self.data_points.iter().find(|dp| dp.uid == uid)
    }

    pub fn parameter(&self, key: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_type_round_trips_through_display() {
        for name in [
            "de.gira.schema.channels.Switch",
            "de.gira.schema.channels.KNX.Dimmer",
            "de.gira.schema.channels.Sonos.Audio",
            "de.gira.schema.channels.KNX.HeatingCoolingSwitchable",
        ] {
            let ct = ChannelType::parse(name);
            assert!(ct.is_supported(), "{name} should be supported");
            assert_eq!(ct.to_string(), name);
        }
    }

    #[test]
    fn unknown_channel_type_is_preserved() {
        let ct = ChannelType::parse("de.gira.schema.channels.Weather");
        assert_eq!(
            ct,
            ChannelType::Unsupported("de.gira.schema.channels.Weather".into())
        );
        assert_eq!(ct.to_string(), "de.gira.schema.channels.Weather");
        assert!(!ChannelType::parse("Switch").is_supported());
    }

    #[test]
    fn parameter_accepts_numeric_strings() {
        let p = Parameter {
            set: None,
            key: "MinColorTemperature".into(),
            value: serde_json::json!("2700"),
        };
        assert_eq!(p.as_f64(), Some(2700.0));
    }
}
