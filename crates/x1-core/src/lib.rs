// x1-core: Device taxonomy and value synchronization on top of x1-api.

pub mod codec;
pub mod config;
pub mod controller;
pub mod convert;
pub mod device;
pub mod error;
pub mod model;
pub mod registry;
pub mod session;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use codec::{Bounds, FanCoilMode, HvacMode, SceneIndex, Value, ValueKind};
pub use config::{AuthCredentials, ControllerConfig, TlsVerification};
pub use controller::{ConnectionState, Controller};
pub use device::{Channel, Device};
pub use error::{CodecError, CoreError};
pub use registry::{Registry, SkipReason, SkippedFunction};
pub use session::Session;
pub use sync::{PushOutcome, SyncEngine, WriteMode, WriteResult};
pub use x1_api::Expand;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ChannelType, ConfigurationSnapshot, DataPoint, FunctionConfig, Location, Parameter, Trade,
};
