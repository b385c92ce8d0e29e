use crate::utils::time;
use std::fmt;
use std::time::SystemTime;

/// Creation time to embed in a signature, millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignatureTime(i64);

impl SignatureTime {
    pub fn now() -> Self {
        Self(time::now_millis())
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Resolve an optional time, substituting the current time when absent
    pub fn or_now(time: Option<Self>) -> Self {
        time.unwrap_or_else(Self::now)
    }
}

impl From<SystemTime> for SignatureTime {
    fn from(value: SystemTime) -> Self {
        Self(time::unix_millis(value))
    }
}

impl From<SignatureTime> for SystemTime {
    fn from(value: SignatureTime) -> Self {
        time::from_unix_millis(value.0)
    }
}

impl fmt::Display for SignatureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
