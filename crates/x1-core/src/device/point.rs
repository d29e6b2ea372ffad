// ── Data-point contracts and bindings ──
//
// A channel declares the logical points it understands (`PointSpec`).
// Binding matches those against a function's data points once, producing
// the `Bindings` every later read and write goes through.

use crate::codec::{Value, ValueKind};
use crate::error::{CodecError, CoreError};
use crate::model::FunctionConfig;

/// Read / write / event capability of a data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub read: bool,
    pub write: bool,
    pub event: bool,
}

impl Access {
    /// `RWE`
    pub const READ_WRITE: Self = Self::new(true, true, true);
    /// `R-E`
    pub const READ_ONLY: Self = Self::new(true, false, true);
    /// `-W-`
    pub const WRITE_ONLY: Self = Self::new(false, true, false);

    pub const fn new(read: bool, write: bool, event: bool) -> Self {
        Self { read, write, event }
    }
}

/// A logical data point a channel knows about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSpec {
    pub name: &'static str,
    /// Other names the controller uses for the same point.
    pub aliases: &'static [&'static str],
    pub kind: ValueKind,
    /// Default capability when the document carries no flags.
    pub access: Access,
    pub required: bool,
    /// Never writable, whatever the document says.
    pub read_only: bool,
}

impl PointSpec {
    pub const fn required(name: &'static str, kind: ValueKind, access: Access) -> Self {
        Self {
            name,
            aliases: &[],
            kind,
            access,
            required: true,
            read_only: false,
        }
    }

    pub const fn optional(name: &'static str, kind: ValueKind, access: Access) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, access)
        }
    }

    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub const fn always_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub const fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|alias| *alias == name)
    }
}

/// A logical point resolved to a concrete data point.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundPoint {
    /// Logical name from the channel contract.
    pub name: &'static str,
    pub uid: String,
    pub kind: ValueKind,
    /// Effective capability: document flags, else the contract default.
    pub access: Access,
}

/// The resolved logical name → data point index of one device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    points: Vec<BoundPoint>,
}

impl Bindings {
    /// Resolve `specs` against `function`'s data points.
    ///
    /// Fails with `MissingRequiredDataPoint` naming the first required
    /// point that has no match. Data points no spec names are ignored.
    pub fn resolve(function: &FunctionConfig, specs: &[PointSpec]) -> Result<Self, CoreError> {
        let mut points = Vec::with_capacity(specs.len());
        for spec in specs {
            let Some(dp) = function.data_points.iter().find(|dp| spec.matches(&dp.name)) else {
                if spec.required {
                    return Err(CoreError::MissingRequiredDataPoint {
                        function: function.uid.clone(),
                        point: spec.name.to_owned(),
                    });
                }
                continue;
            };

            let write = dp.can_write.unwrap_or(spec.access.write) && !spec.read_only;
            points.push(BoundPoint {
                name: spec.name,
                uid: dp.uid.clone(),
                kind: spec.kind,
                access: Access {
                    read: dp.can_read.unwrap_or(spec.access.read),
                    write,
                    event: dp.can_event.unwrap_or(spec.access.event),
                },
            });
        }
        Ok(Self { points })
    }

    pub fn get(&self, name: &str) -> Option<&BoundPoint> {
        self.points.iter().find(|p| p.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn by_uid(&self, uid: &str) -> Option<&BoundPoint> {
        self.points.iter().find(|p| p.uid == uid)
    }

    /// Points with effective read access.
    pub fn readable(&self) -> impl Iterator<Item = &BoundPoint> {
        self.points.iter().filter(|p| p.access.read)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Cache entry for one logical point.
#[derive(Debug, Clone, PartialEq)]
pub enum PointState {
    /// Never pulled, not reported, or write-only.
    Unknown,
    Value(Value),
    /// The controller reported text the point's codec rejected.
    Raw { raw: String, error: CodecError },
}

impl PointState {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}
