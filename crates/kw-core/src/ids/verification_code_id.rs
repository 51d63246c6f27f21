use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Verification code record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationCodeId(String);

impl VerificationCodeId {
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

impl Display for VerificationCodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VerificationCodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VerificationCodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
