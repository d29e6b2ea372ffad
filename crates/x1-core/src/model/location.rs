use serde::Serialize;

/// A node of the location tree (`expand=locations`): building, floor, room.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    pub display_name: String,
    pub location_type: Option<String>,
    /// Uids of functions placed directly in this location.
    pub function_uids: Vec<String>,
    pub children: Vec<Location>,
}

impl Location {
    /// Depth-first search for a location by display name, including `self`.
    pub fn find(&self, display_name: &str) -> Option<&Location> {
        if self.display_name == display_name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(display_name))
    }

    /// Function uids of this location and all nested ones, parents first.
    pub fn all_function_uids(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.function_uids.iter().map(String::as_str).collect();
        for child in &self.children {
            out.extend(child.all_function_uids());
        }
        out
    }
}

/// A trade grouping (`expand=trades`): lighting, shading, heating.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Trade {
    pub display_name: String,
    pub trade_type: Option<String>,
    pub function_uids: Vec<String>,
}
