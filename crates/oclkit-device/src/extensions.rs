//! Exact-token lookup in space-delimited extension lists.

/// Whether `name` appears as a whole token in the space-delimited
/// `extensions` list.
///
/// Matching is exact on length and byte content; `"cl_khr_fp64x"` does not
/// match a query for `"cl_khr_fp64"` and vice versa.
///
/// # Examples
///
/// ```
/// use oclkit_device::extensions::contains_extension;
///
/// let list = "cl_khr_fp64 cl_khr_gl_sharing";
/// assert!(contains_extension(list, "cl_khr_fp64"));
/// assert!(!contains_extension(list, "cl_khr_fp"));
/// ```
pub fn contains_extension(extensions: &str, name: &str) -> bool {
    !name.is_empty() && extensions.split_whitespace().any(|token| token == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = "cl_khr_fp64 cl_khr_gl_sharing";

    #[test]
    fn whole_tokens_match() {
        assert!(contains_extension(LIST, "cl_khr_fp64"));
        assert!(contains_extension(LIST, "cl_khr_gl_sharing"));
    }

    #[test]
    fn prefixes_do_not_match() {
        assert!(!contains_extension(LIST, "cl_khr_fp"));
        assert!(!contains_extension(LIST, "cl_khr"));
    }

    #[test]
    fn longer_names_do_not_match() {
        assert!(!contains_extension(LIST, "cl_khr_fp64x"));
        assert!(!contains_extension("cl_khr_fp64x", "cl_khr_fp64"));
    }

    #[test]
    fn empty_inputs() {
        assert!(!contains_extension("", "cl_khr_fp64"));
        assert!(!contains_extension(LIST, ""));
    }

    #[test]
    fn repeated_whitespace_is_tolerated() {
        assert!(contains_extension("  cl_khr_fp64   cl_khr_gl_sharing ", "cl_khr_gl_sharing"));
    }
}
