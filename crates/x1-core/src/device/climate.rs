// Room temperature controllers: switchable set-point channels, KNX
// heating/cooling controllers and fan coils. Measured temperatures,
// status bits and error reports are read-only whatever the document says.

use super::Channel;
use super::common::{DeviceCore, ON_OFF};
use super::point::{Access, PointSpec};
use crate::codec::{FanCoilMode, HvacMode, Value, ValueKind};
use crate::error::CoreError;
use crate::model::FunctionConfig;

const SET_POINT: &str = "SetPoint";
const CURRENT_TEMPERATURE: &str = "CurrentTemperature";
const MODE: &str = "Mode";
const PRESENCE: &str = "Presence";
const HEAT_COOL_MODE: &str = "HeatCoolMode";
const STATUS: &str = "Status";
const FAN_SPEED: &str = "FanSpeed";
const ERROR: &str = "Error";
const ERROR_TEXT: &str = "ErrorText";

const SET_POINT_POINT: PointSpec =
    PointSpec::required(SET_POINT, ValueKind::Temperature, Access::READ_WRITE)
        .aliases(&["Set-Point"]);
const CURRENT_POINT: PointSpec =
    PointSpec::optional(CURRENT_TEMPERATURE, ValueKind::Temperature, Access::READ_ONLY)
        .aliases(&["Current"])
        .always_read_only();
const ON_OFF_POINT: PointSpec = PointSpec::optional(ON_OFF, ValueKind::Binary, Access::READ_WRITE);

const STATUS_HEATING: i64 = 0b01;
const STATUS_COOLING: i64 = 0b10;

// ── RoomTemperature ──────────────────────────────────────────────────

/// `RoomTemperatureSwitchable`: a set point with optional on/off.
#[derive(Debug)]
pub struct RoomTemperature {
    core: DeviceCore,
}

impl Channel for RoomTemperature {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        vec![SET_POINT_POINT, ON_OFF_POINT, CURRENT_POINT]
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl RoomTemperature {
    pub fn has_on_off(&self) -> bool {
        self.core.has(ON_OFF)
    }

    pub fn has_current_temperature(&self) -> bool {
        self.core.has(CURRENT_TEMPERATURE)
    }

    /// Set the target temperature in °C.
    pub async fn set_target_temperature(&self, celsius: f64) -> Result<(), CoreError> {
        self.core.push(SET_POINT, &Value::Float(celsius)).await
    }

    pub async fn target_temperature(&self) -> Option<f64> {
        self.core.f64_value(SET_POINT).await
    }

    pub async fn current_temperature(&self) -> Option<f64> {
        self.core.f64_value(CURRENT_TEMPERATURE).await
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.core.set_on(true).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.core.set_on(false).await
    }

    pub async fn is_on(&self) -> Option<bool> {
        self.core.bool_value(ON_OFF).await
    }
}

// ── HeatingCooling ───────────────────────────────────────────────────

/// `KNX.HeatingCoolingSwitchable`.
#[derive(Debug)]
pub struct HeatingCooling {
    core: DeviceCore,
}

impl Channel for HeatingCooling {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        vec![
            SET_POINT_POINT,
            PointSpec::optional(MODE, ValueKind::HvacMode, Access::READ_WRITE),
            PointSpec::optional(PRESENCE, ValueKind::Binary, Access::READ_WRITE),
            PointSpec::optional(HEAT_COOL_MODE, ValueKind::Binary, Access::READ_WRITE)
                .aliases(&["Heat-Cool"]),
            ON_OFF_POINT,
            PointSpec::optional(STATUS, ValueKind::Byte, Access::READ_ONLY).always_read_only(),
            CURRENT_POINT,
        ]
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl HeatingCooling {
    pub fn has_mode(&self) -> bool {
        self.core.has(MODE)
    }

    pub fn has_presence(&self) -> bool {
        self.core.has(PRESENCE)
    }

    pub fn has_heat_cool_mode(&self) -> bool {
        self.core.has(HEAT_COOL_MODE)
    }

    pub fn has_on_off(&self) -> bool {
        self.core.has(ON_OFF)
    }

    pub fn has_status(&self) -> bool {
        self.core.has(STATUS)
    }

    pub fn has_current_temperature(&self) -> bool {
        self.core.has(CURRENT_TEMPERATURE)
    }

    pub async fn set_target_temperature(&self, celsius: f64) -> Result<(), CoreError> {
        self.core.push(SET_POINT, &Value::Float(celsius)).await
    }

    pub async fn target_temperature(&self) -> Option<f64> {
        self.core.f64_value(SET_POINT).await
    }

    pub async fn current_temperature(&self) -> Option<f64> {
        self.core.f64_value(CURRENT_TEMPERATURE).await
    }

    pub async fn set_mode(&self, mode: HvacMode) -> Result<(), CoreError> {
        self.core.push(MODE, &Value::HvacMode(mode)).await
    }

    pub async fn mode(&self) -> Option<HvacMode> {
        match self.core.value(MODE).await {
            Some(Value::HvacMode(m)) => Some(m),
            _ => None,
        }
    }

    pub async fn set_presence(&self, present: bool) -> Result<(), CoreError> {
        self.core.push(PRESENCE, &Value::Bool(present)).await
    }

    pub async fn presence(&self) -> Option<bool> {
        self.core.bool_value(PRESENCE).await
    }

    /// `true` selects heating, `false` cooling.
    pub async fn set_heat_cool_mode(&self, heating: bool) -> Result<(), CoreError> {
        self.core.push(HEAT_COOL_MODE, &Value::Bool(heating)).await
    }

    pub async fn heat_cool_mode(&self) -> Option<bool> {
        self.core.bool_value(HEAT_COOL_MODE).await
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.core.set_on(true).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.core.set_on(false).await
    }

    pub async fn is_on(&self) -> Option<bool> {
        self.core.bool_value(ON_OFF).await
    }

    /// Bit 0 of the cached Status.
    pub async fn is_heating(&self) -> Option<bool> {
        self.status_bit(STATUS_HEATING).await
    }

    /// Bit 1 of the cached Status.
    pub async fn is_cooling(&self) -> Option<bool> {
        self.status_bit(STATUS_COOLING).await
    }

    async fn status_bit(&self, mask: i64) -> Option<bool> {
        let status = self.core.value(STATUS).await?.as_i64()?;
        Some(status & mask != 0)
    }
}

// ── FanCoil ──────────────────────────────────────────────────────────

/// `KNX.FanCoil`.
#[derive(Debug)]
pub struct FanCoil {
    core: DeviceCore,
}

impl Channel for FanCoil {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        vec![
            SET_POINT_POINT,
            PointSpec::required(MODE, ValueKind::FanCoilMode, Access::READ_WRITE),
            PointSpec::optional(FAN_SPEED, ValueKind::PERCENT, Access::READ_WRITE)
                .aliases(&["Fan-Speed"]),
            ON_OFF_POINT,
            CURRENT_POINT,
            PointSpec::optional(ERROR, ValueKind::Binary, Access::READ_ONLY).always_read_only(),
            PointSpec::optional(ERROR_TEXT, ValueKind::Text, Access::READ_ONLY)
                .aliases(&["Error-Text"])
                .always_read_only(),
        ]
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl FanCoil {
    pub fn has_fan_speed(&self) -> bool {
        self.core.has(FAN_SPEED)
    }

    pub fn has_on_off(&self) -> bool {
        self.core.has(ON_OFF)
    }

    pub fn has_error(&self) -> bool {
        self.core.has(ERROR)
    }

    pub async fn set_target_temperature(&self, celsius: f64) -> Result<(), CoreError> {
        self.core.push(SET_POINT, &Value::Float(celsius)).await
    }

    pub async fn target_temperature(&self) -> Option<f64> {
        self.core.f64_value(SET_POINT).await
    }

    pub async fn current_temperature(&self) -> Option<f64> {
        self.core.f64_value(CURRENT_TEMPERATURE).await
    }

    pub async fn set_mode(&self, mode: FanCoilMode) -> Result<(), CoreError> {
        self.core.push(MODE, &Value::FanCoilMode(mode)).await
    }

    pub async fn mode(&self) -> Option<FanCoilMode> {
        match self.core.value(MODE).await {
            Some(Value::FanCoilMode(m)) => Some(m),
            _ => None,
        }
    }

    pub async fn set_fan_speed(&self, percent: f64) -> Result<(), CoreError> {
        self.core.push(FAN_SPEED, &Value::Float(percent)).await
    }

    pub async fn fan_speed(&self) -> Option<f64> {
        self.core.f64_value(FAN_SPEED).await
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.core.set_on(true).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.core.set_on(false).await
    }

    pub async fn is_on(&self) -> Option<bool> {
        self.core.bool_value(ON_OFF).await
    }

    /// Cached error flag.
    pub async fn has_fault(&self) -> Option<bool> {
        self.core.bool_value(ERROR).await
    }

    pub async fn error_text(&self) -> Option<String> {
        self.core.text_value(ERROR_TEXT).await
    }
}
