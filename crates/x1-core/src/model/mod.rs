// ── Configuration model ──
//
// Validated, immutable view of the controller's uiconfig document. Built
// once per configuration revision (see `convert`) and shared read-only
// between devices through `Arc`.

pub mod data_point;
pub mod function;
pub mod location;
pub mod snapshot;

pub use data_point::DataPoint;
pub use function::{ChannelType, FunctionConfig, Parameter};
pub use location::{Location, Trade};
pub use snapshot::ConfigurationSnapshot;
