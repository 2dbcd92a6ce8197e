//! Built-in helper methods.
//!
//! A small fixed set of method names that lower to runtime helper calls
//! with the receiver as first argument, consulted before a call falls
//! back to a plain method invocation on the receiver. Arity is part of
//! the key: `x.eq(y)` is the helper, `x.eq()` is a plain method call.

/// Resolve a receiver-qualified method name and argument count to a
/// runtime helper name.
pub(crate) fn helper_call(method: &str, argc: usize) -> Option<&'static str> {
    match (method, argc) {
        ("clone", 0) => Some("clone"),
        ("debug", 0) => Some("debug"),
        ("eq", 1) => Some("eq"),
        ("secs", 0) => Some("secs"),
        ("millis", 0) => Some("millis"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_match_on_name_and_arity() {
        assert_eq!(helper_call("clone", 0), Some("clone"));
        assert_eq!(helper_call("eq", 1), Some("eq"));
        assert_eq!(helper_call("eq", 0), None);
        assert_eq!(helper_call("clone", 1), None);
        assert_eq!(helper_call("area", 0), None);
    }
}
