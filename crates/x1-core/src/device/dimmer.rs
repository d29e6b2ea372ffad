// Dimmable lights: plain KNX dimmers, RGBW and tunable-white channels.
//
// All three share OnOff and optional Brightness. Without Brightness a
// dimmer behaves as a switch.

use super::Channel;
use super::common::{DeviceCore, ON_OFF};
use super::point::{Access, PointSpec};
use crate::codec::{Bounds, Value, ValueKind};
use crate::error::CoreError;
use crate::model::FunctionConfig;
use crate::sync::PushOutcome;

const BRIGHTNESS: &str = "Brightness";
const SHIFT: &str = "Shift";
const RED: &str = "Red";
const GREEN: &str = "Green";
const BLUE: &str = "Blue";
const WHITE: &str = "White";
const COLOR_TEMPERATURE: &str = "ColorTemperature";

const ON_OFF_POINT: PointSpec = PointSpec::required(ON_OFF, ValueKind::Binary, Access::READ_WRITE);
const BRIGHTNESS_POINT: PointSpec =
    PointSpec::optional(BRIGHTNESS, ValueKind::PERCENT, Access::READ_WRITE);

const fn color(name: &'static str) -> PointSpec {
    PointSpec::optional(name, ValueKind::PERCENT, Access::READ_WRITE)
}

/// Parameter keys carrying the device's color temperature range.
pub const MIN_COLOR_TEMPERATURE: &str = "MinColorTemperature";
pub const MAX_COLOR_TEMPERATURE: &str = "MaxColorTemperature";

// ── Dimmer ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Dimmer {
    core: DeviceCore,
}

impl Channel for Dimmer {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        vec![
            ON_OFF_POINT,
            BRIGHTNESS_POINT,
            PointSpec::optional(
                SHIFT,
                ValueKind::Percent(Bounds::SIGNED_PERCENT),
                Access::WRITE_ONLY,
            ),
        ]
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl Dimmer {
    pub fn has_brightness(&self) -> bool {
        self.core.has(BRIGHTNESS)
    }

    pub fn has_shift(&self) -> bool {
        self.core.has(SHIFT)
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.core.set_on(true).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.core.set_on(false).await
    }

    pub async fn toggle(&self) -> Result<bool, CoreError> {
        self.core.toggle().await
    }

    pub async fn is_on(&self) -> Option<bool> {
        self.core.bool_value(ON_OFF).await
    }

    /// Set the brightness in percent (0–100).
    pub async fn dim_to(&self, percent: f64) -> Result<(), CoreError> {
        self.core.push(BRIGHTNESS, &Value::Float(percent)).await
    }

    /// Relative dimming by -100–100 percent.
    pub async fn shift(&self, percent: f64) -> Result<(), CoreError> {
        self.core.push(SHIFT, &Value::Float(percent)).await
    }

    pub async fn brightness(&self) -> Option<f64> {
        self.core.f64_value(BRIGHTNESS).await
    }
}

// ── DimmerRgbw ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct DimmerRgbw {
    core: DeviceCore,
}

/// An RGB(W) color, each channel in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgbw {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub white: Option<f64>,
}

impl Channel for DimmerRgbw {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        vec![
            ON_OFF_POINT,
            BRIGHTNESS_POINT,
            color(RED),
            color(GREEN),
            color(BLUE),
            color(WHITE),
        ]
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl DimmerRgbw {
    pub fn has_brightness(&self) -> bool {
        self.core.has(BRIGHTNESS)
    }

    pub fn has_color(&self) -> bool {
        [RED, GREEN, BLUE].iter().all(|name| self.core.has(name))
    }

    pub fn has_white(&self) -> bool {
        self.core.has(WHITE)
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.core.set_on(true).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.core.set_on(false).await
    }

    pub async fn toggle(&self) -> Result<bool, CoreError> {
        self.core.toggle().await
    }

    pub async fn is_on(&self) -> Option<bool> {
        self.core.bool_value(ON_OFF).await
    }

    pub async fn dim_to(&self, percent: f64) -> Result<(), CoreError> {
        self.core.push(BRIGHTNESS, &Value::Float(percent)).await
    }

    pub async fn brightness(&self) -> Option<f64> {
        self.core.f64_value(BRIGHTNESS).await
    }

    /// Set every color channel, one write per channel.
    ///
    /// All channels are validated before the first write; the writes
    /// themselves are independent and reported individually.
    pub async fn set_color(&self, color: Rgbw) -> Result<PushOutcome, CoreError> {
        let mut writes = vec![
            (RED, Value::Float(color.red)),
            (GREEN, Value::Float(color.green)),
            (BLUE, Value::Float(color.blue)),
        ];
        if let Some(white) = color.white {
            writes.push((WHITE, Value::Float(white)));
        }
        self.core.push_many(&writes).await
    }

    /// Cached color, if every RGB channel is known.
    pub async fn color(&self) -> Option<Rgbw> {
        Some(Rgbw {
            red: self.core.f64_value(RED).await?,
            green: self.core.f64_value(GREEN).await?,
            blue: self.core.f64_value(BLUE).await?,
            white: self.core.f64_value(WHITE).await,
        })
    }
}

// ── DimmerWhite ──────────────────────────────────────────────────────

#[derive(Debug)]
pub struct DimmerWhite {
    core: DeviceCore,
}

/// Color temperature bounds declared by the function's parameters.
fn color_temperature_bounds(function: &FunctionConfig) -> Option<Bounds> {
    let min = function.parameter(MIN_COLOR_TEMPERATURE)?.as_f64()?;
    let max = function.parameter(MAX_COLOR_TEMPERATURE)?.as_f64()?;
    (min <= max).then_some(Bounds::new(min, max))
}

impl Channel for DimmerWhite {
    fn points(function: &FunctionConfig) -> Vec<PointSpec> {
        vec![
            ON_OFF_POINT,
            BRIGHTNESS_POINT,
            PointSpec::optional(
                COLOR_TEMPERATURE,
                ValueKind::Float(color_temperature_bounds(function)),
                Access::READ_WRITE,
            )
            .aliases(&["Color-Temperature"]),
        ]
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl DimmerWhite {
    pub fn has_brightness(&self) -> bool {
        self.core.has(BRIGHTNESS)
    }

    pub fn has_color_temperature(&self) -> bool {
        self.core.has(COLOR_TEMPERATURE)
    }

    /// Bounds for `set_color_temperature`, when the device declares them.
    pub fn color_temperature_range(&self) -> Option<Bounds> {
        color_temperature_bounds(self.core.function())
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.core.set_on(true).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.core.set_on(false).await
    }

    pub async fn toggle(&self) -> Result<bool, CoreError> {
        self.core.toggle().await
    }

    pub async fn is_on(&self) -> Option<bool> {
        self.core.bool_value(ON_OFF).await
    }

    pub async fn dim_to(&self, percent: f64) -> Result<(), CoreError> {
        self.core.push(BRIGHTNESS, &Value::Float(percent)).await
    }

    pub async fn brightness(&self) -> Option<f64> {
        self.core.f64_value(BRIGHTNESS).await
    }

    /// Set the color temperature in Kelvin.
    pub async fn set_color_temperature(&self, kelvin: f64) -> Result<(), CoreError> {
        self.core.push(COLOR_TEMPERATURE, &Value::Float(kelvin)).await
    }

    pub async fn color_temperature(&self) -> Option<f64> {
        self.core.f64_value(COLOR_TEMPERATURE).await
    }
}
