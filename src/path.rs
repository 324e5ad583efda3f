//! Path normalization.
//!
//! Every path the registry stores goes through [`normalize`]: split on `/`,
//! drop empty segments, rejoin with a single `/`, prepend one leading `/`.

/// Normalizes a path. Idempotent.
///
/// ```rust
/// use waypost::path::normalize;
///
/// assert_eq!(normalize("//foo//bar/"), "/foo/bar");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Joins `sub` under `prefix` and normalizes the result.
pub fn join(prefix: &str, sub: &str) -> String {
    normalize(&format!("{prefix}/{sub}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_duplicate_and_trailing_slashes() {
        assert_eq!(normalize("//foo//bar/"), "/foo/bar");
        assert_eq!(normalize("foo/bar"), "/foo/bar");
        assert_eq!(normalize("///"), "/");
        assert_eq!(normalize(""), "/");
    }

    #[test]
    fn is_idempotent() {
        for raw in ["", "/", "a", "//a//b//", "/users/{id}/", "x/y/z", "/a/./b"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn keeps_parameter_segments() {
        assert_eq!(normalize("/users//{id}"), "/users/{id}");
        assert_eq!(normalize("/files/{*rest}/"), "/files/{*rest}");
    }

    #[test]
    fn join_handles_root_and_empty_parts() {
        assert_eq!(join("", "users"), "/users");
        assert_eq!(join("/", "/users/"), "/users");
        assert_eq!(join("/api", ""), "/api");
        assert_eq!(join("/api/", "/v1//ping"), "/api/v1/ping");
    }
}
