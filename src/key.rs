use std::fmt;
use std::sync::Arc;

/// Identifies one profiled method: qualified owner name plus method signature.
///
/// The instrumentation pass builds one key per call site at attach time and
/// reuses it for every invocation, so keys are immutable and cheap to clone
/// (shared string storage). Equality and hashing are by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    owner: Arc<str>,
    signature: Arc<str>,
}

impl MethodKey {
    pub fn new(owner: &str, signature: &str) -> Self {
        Self {
            owner: owner.into(),
            signature: signature.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Fully-qualified `owner.signature` form used for lookup and reporting.
    pub fn qualified(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.signature)
    }
}
