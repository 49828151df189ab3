//! Identity of an intercepted call.

use std::fmt;

/// Identity of a single intercepted call: the declaring type's fully-qualified
/// name plus the method name, borrowed from the host interception layer for
/// the duration of the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallRef<'a> {
    /// Fully-qualified name of the declaring type, e.g. `svc.order.OrderService`.
    pub type_name: &'a str,
    /// Method name, e.g. `save`.
    pub method: &'a str,
}

impl<'a> CallRef<'a> {
    pub fn new(type_name: &'a str, method: &'a str) -> Self {
        Self { type_name, method }
    }

    /// `type.method` form used in log records.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.type_name, self.method)
    }
}

impl fmt::Display for CallRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.method)
    }
}
