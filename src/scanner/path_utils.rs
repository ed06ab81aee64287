//! Root path normalization.
//!
//! The root argument may be written with Windows-style or POSIX-style
//! separators. [`normalize`] rewrites every backslash to a forward slash and
//! leaves everything else, including relative components, to the walker.
//!
//! # Example
//!
//! ```
//! use dups::scanner::path_utils::normalize;
//!
//! assert_eq!(normalize(r"C:\Users\me\Downloads"), "C:/Users/me/Downloads");
//! assert_eq!(normalize("/already/posix"), "/already/posix");
//! ```

use std::borrow::Cow;

/// Replace every `\` with `/`.
///
/// No filesystem access is performed. The result is a fixed point:
/// `normalize(&normalize(p)) == normalize(p)`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    normalize_cow(raw).into_owned()
}

/// Like [`normalize`], borrowing when the input has no backslashes.
#[must_use]
pub fn normalize_cow(raw: &str) -> Cow<'_, str> {
    if raw.contains('\\') {
        Cow::Owned(raw.replace('\\', "/"))
    } else {
        Cow::Borrowed(raw)
    }
}
