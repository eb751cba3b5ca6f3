//! Record id ↔ store URI translation.
//!
//! # Invariants
//! - The base path appears at most once in any `id_to_uri` result, however
//!   many times it is applied.
//! - For ids without a base-path prefix, `uri_to_id(id_to_uri(id))` is `id`
//!   with any leading `/` removed.

use crate::config::StoreConfig;

/// Stateless translator scoped by host and base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityMapper {
    host: String,
    base_path: String,
}

impl IdentityMapper {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            host: config.host.clone(),
            base_path: config.base_path.clone(),
        }
    }

    /// Absolute URI of the base-path container (`host + base_path`).
    pub fn container_uri(&self) -> String {
        format!("{}{}", self.host, self.base_path)
    }

    /// Resolves a record id to an absolute store URI.
    pub fn id_to_uri(&self, id: &str) -> String {
        if self.is_scoped_uri(id) {
            return id.to_string();
        }

        let id = if id.starts_with('/') {
            id.to_string()
        } else {
            format!("/{id}")
        };
        let scoped = if id.starts_with(&format!("{}/", self.base_path)) {
            id
        } else {
            format!("{}{id}", self.base_path)
        };
        format!("{}{scoped}", self.host)
    }

    /// Recovers the record id from an absolute store URI.
    ///
    /// A URI outside the container is returned unchanged.
    pub fn uri_to_id(&self, uri: &str) -> String {
        let container = self.container_uri();
        let rest = match uri.strip_prefix(container.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => uri,
        };
        rest.strip_prefix('/').unwrap_or(rest).to_string()
    }

    /// Whether `uri` is already an absolute URI under the container.
    pub fn is_scoped_uri(&self, uri: &str) -> bool {
        let container = self.container_uri();
        match uri.strip_prefix(container.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IdentityMapper;
    use crate::config::StoreConfig;

    fn mapper(base_path: &str) -> IdentityMapper {
        IdentityMapper::new(&StoreConfig::new("http://localhost:8983/rest", base_path).unwrap())
    }

    #[test]
    fn id_round_trips_through_uri() {
        let ids = mapper("/test");
        assert_eq!(ids.id_to_uri("abc"), "http://localhost:8983/rest/test/abc");
        assert_eq!(ids.uri_to_id(&ids.id_to_uri("abc")), "abc");
        assert_eq!(ids.uri_to_id(&ids.id_to_uri("/abc")), "abc");
        assert_eq!(ids.uri_to_id(&ids.id_to_uri("a/b/c")), "a/b/c");
    }

    #[test]
    fn base_path_appears_once_under_repeated_application() {
        let ids = mapper("/test");
        let once = ids.id_to_uri("abc");
        let twice = ids.id_to_uri(&once);
        assert_eq!(once, twice);
        assert_eq!(once.matches("/test").count(), 1);

        assert_eq!(ids.id_to_uri("/test/abc"), once);
    }

    #[test]
    fn base_path_prefix_requires_segment_boundary() {
        let ids = mapper("/test");
        assert_eq!(
            ids.id_to_uri("/testing"),
            "http://localhost:8983/rest/test/testing"
        );
    }

    #[test]
    fn uri_to_id_strips_only_whole_base_path_segments() {
        let ids = mapper("/test");
        assert_eq!(
            ids.uri_to_id("http://localhost:8983/rest/testing"),
            "http://localhost:8983/rest/testing"
        );
        assert_eq!(ids.uri_to_id("http://localhost:8983/rest/test/ing"), "ing");
        assert_eq!(ids.uri_to_id("http://localhost:8983/rest/test"), "");
    }

    #[test]
    fn empty_base_path_maps_directly_under_host() {
        let ids = mapper("");
        assert_eq!(ids.id_to_uri("abc"), "http://localhost:8983/rest/abc");
        assert_eq!(ids.uri_to_id("http://localhost:8983/rest/abc"), "abc");
        assert_eq!(ids.container_uri(), "http://localhost:8983/rest");
    }
}
