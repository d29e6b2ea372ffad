use serde::Serialize;

/// One named value slot of a function, as declared by the controller.
///
/// Capability flags are `None` when the document was fetched without
/// `expand=dataPointFlags`; binding resolves them against the channel's
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataPoint {
    pub uid: String,
    pub name: String,
    pub can_read: Option<bool>,
    pub can_write: Option<bool>,
    pub can_event: Option<bool>,
}

impl DataPoint {
    /// A data point without capability flags.
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            can_read: None,
            can_write: None,
            can_event: None,
        }
    }

    pub fn with_flags(mut self, read: bool, write: bool, event: bool) -> Self {
        self.can_read = Some(read);
        self.can_write = Some(write);
        self.can_event = Some(event);
        self
    }
}
