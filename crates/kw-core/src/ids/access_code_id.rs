use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Access code record identifier (not the code value itself)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessCodeId(String);

impl AccessCodeId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for AccessCodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccessCodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccessCodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
