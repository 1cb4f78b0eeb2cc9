use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Outcome code of a processing or relocation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCode {
    Accepted,
    Rejected,
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StatusCode::Accepted => write!(f, "accepted"),
            StatusCode::Rejected => write!(f, "rejected"),
        }
    }
}

/// Verdict for one file. A reason is only carried by rejections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStatus {
    code: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl ProcessingStatus {
    pub fn accepted() -> Self {
        Self {
            code: StatusCode::Accepted,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            code: StatusCode::Rejected,
            reason: Some(reason.into()),
        }
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn is_accepted(&self) -> bool {
        self.code == StatusCode::Accepted
    }

    pub fn is_rejected(&self) -> bool {
        self.code == StatusCode::Rejected
    }
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.reason {
            Some(reason) => write!(f, "{} ({})", self.code, reason),
            None => write!(f, "{}", self.code),
        }
    }
}
