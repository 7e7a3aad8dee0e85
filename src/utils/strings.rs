//! String slicing helpers.

/// The portion of `text` before the first occurrence of `pattern`.
///
/// Returns `None` when the pattern does not occur.
///
/// # Examples
///
/// ```rust
/// use dotresolve::utils::before;
///
/// assert_eq!(before("Widget::new", "::"), Some("Widget"));
/// assert_eq!(before("Widget", "::"), None);
/// ```
#[must_use]
pub fn before<'a>(text: &'a str, pattern: &str) -> Option<&'a str> {
    text.split_once(pattern).map(|(head, _)| head)
}

/// The portion of `text` after the first occurrence of `pattern`.
///
/// Returns `None` when the pattern does not occur.
#[must_use]
pub fn after<'a>(text: &'a str, pattern: &str) -> Option<&'a str> {
    text.split_once(pattern).map(|(_, tail)| tail)
}

/// The portion of `text` between the first occurrence of `start` and the
/// next occurrence of `end` after it.
///
/// # Examples
///
/// ```rust
/// use dotresolve::utils::between;
///
/// assert_eq!(between("get_Value()", "get_", "("), Some("Value"));
/// assert_eq!(between("get_Value", "get_", "("), None);
/// ```
#[must_use]
pub fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    before(after(text, start)?, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_before_after() {
        assert_eq!(before("a.b.c", "."), Some("a"));
        assert_eq!(after("a.b.c", "."), Some("b.c"));
        assert_eq!(before("abc", "x"), None);
        assert_eq!(after("abc", "x"), None);
    }

    #[test]
    fn test_between() {
        assert_eq!(between("[inner]", "[", "]"), Some("inner"));
        assert_eq!(between("[inner", "[", "]"), None);
        assert_eq!(between("inner]", "[", "]"), None);
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(before("::x", "::"), Some(""));
        assert_eq!(after("x::", "::"), Some(""));
    }
}
