// ── API-to-domain conversions ──
//
// Turns the raw `x1_api` uiconfig document into a validated
// `ConfigurationSnapshot`. The checks are structural only: unknown channel
// types and extra fields pass through, missing optional fields become
// absent. A structural failure rejects the whole document.

use std::collections::HashSet;
use std::sync::Arc;

use x1_api::models::{RawDataPoint, RawFunction, RawLocation, RawParameter, RawTrade, UiConfig};

use crate::error::CoreError;
use crate::model::{
    ChannelType, ConfigurationSnapshot, DataPoint, FunctionConfig, Location, Parameter, Trade,
};

impl ConfigurationSnapshot {
    /// Parse a uiconfig document from arbitrary JSON.
    pub fn parse(document: &serde_json::Value) -> Result<Self, CoreError> {
        let raw: UiConfig = serde_json::from_value(document.clone())
            .map_err(|e| CoreError::malformed(format!("unexpected document shape: {e}")))?;
        Self::try_from(raw)
    }
}

impl TryFrom<UiConfig> for ConfigurationSnapshot {
    type Error = CoreError;

    fn try_from(raw: UiConfig) -> Result<Self, Self::Error> {
        let uid = raw
            .uid
            .ok_or_else(|| CoreError::malformed("configuration has no uid"))?;
        let functions = raw
            .functions
            .ok_or_else(|| CoreError::malformed("configuration has no functions array"))?
            .into_iter()
            .enumerate()
            .map(|(index, f)| convert_function(index, f).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            uid,
            functions,
            locations: raw.locations.into_iter().map(Location::from).collect(),
            trades: raw.trades.into_iter().map(Trade::from).collect(),
        })
    }
}

fn convert_function(index: usize, raw: RawFunction) -> Result<FunctionConfig, CoreError> {
    let uid = raw
        .uid
        .ok_or_else(|| CoreError::malformed(format!("function #{index} has no uid")))?;

    let mut seen = HashSet::new();
    let mut data_points = Vec::with_capacity(raw.data_points.len());
    for dp in raw.data_points {
        let dp = convert_data_point(&uid, dp)?;
        if !seen.insert(dp.uid.clone()) {
            return Err(CoreError::malformed(format!(
                "function {uid} declares data point {} twice",
                dp.uid
            )));
        }
        data_points.push(dp);
    }

    Ok(FunctionConfig {
        display_name: raw.display_name.unwrap_or_default(),
        function_type: raw.function_type.unwrap_or_default(),
        channel_type: ChannelType::parse(raw.channel_type.as_deref().unwrap_or_default()),
        data_points,
        // Keyless parameters cannot be looked up, so they are dropped.
        parameters: raw
            .parameters
            .into_iter()
            .filter_map(convert_parameter)
            .collect(),
        uid,
    })
}

fn convert_data_point(function: &str, raw: RawDataPoint) -> Result<DataPoint, CoreError> {
    let uid = raw.uid.ok_or_else(|| {
        CoreError::malformed(format!("function {function} has a data point without uid"))
    })?;
    let name = raw.name.ok_or_else(|| {
        CoreError::malformed(format!("data point {uid} of function {function} has no name"))
    })?;
    Ok(DataPoint {
        uid,
        name,
        can_read: raw.can_read,
        can_write: raw.can_write,
        can_event: raw.can_event,
    })
}

fn convert_parameter(raw: RawParameter) -> Option<Parameter> {
    Some(Parameter {
        set: raw.set,
        key: raw.key?,
        value: raw.value,
    })
}

impl From<RawLocation> for Location {
    fn from(raw: RawLocation) -> Self {
        Self {
            display_name: raw.display_name,
            location_type: raw.location_type,
            function_uids: raw.functions,
            children: raw.locations.into_iter().map(Location::from).collect(),
        }
    }
}

impl From<RawTrade> for Trade {
    fn from(raw: RawTrade) -> Self {
        Self {
            display_name: raw.display_name,
            trade_type: raw.trade_type,
            function_uids: raw.functions,
        }
    }
}
