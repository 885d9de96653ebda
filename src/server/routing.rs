// src/server/routing.rs
// Path matching for the `/base` and `/base/{id}` resource shapes both services expose.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    Collection,
    Item(&'a str),
}

/// Match `path` against a resource rooted at `base`. A trailing slash is tolerated.
pub fn match_resource<'a>(path: &'a str, base: &str) -> Option<Resource<'a>> {
    let rest = path.strip_prefix(base)?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);

    if rest.is_empty() {
        return Some(Resource::Collection);
    }

    let segment = rest.strip_prefix('/')?;
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    Some(Resource::Item(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_collection_and_item() {
        assert_eq!(match_resource("/api/users", "/api/users"), Some(Resource::Collection));
        assert_eq!(match_resource("/api/users/", "/api/users"), Some(Resource::Collection));
        assert_eq!(match_resource("/api/users/7", "/api/users"), Some(Resource::Item("7")));
        assert_eq!(match_resource("/api/users/7/", "/api/users"), Some(Resource::Item("7")));
    }

    #[test]
    fn rejects_other_paths() {
        assert_eq!(match_resource("/api/usersX", "/api/users"), None);
        assert_eq!(match_resource("/api/users/7/roles", "/api/users"), None);
        assert_eq!(match_resource("/api/client/users", "/api/users"), None);
        assert_eq!(match_resource("/", "/api/users"), None);
    }
}
