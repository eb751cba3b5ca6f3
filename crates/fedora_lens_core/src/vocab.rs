//! Predicate URIs used by the store and by common declarations.

/// Server-managed: creation stamp (epoch milliseconds literal).
pub const FEDORA_CREATED: &str = "http://fedora.info/definitions/v4/repository#created";
/// Server-managed: last modification stamp (epoch milliseconds literal).
pub const FEDORA_LAST_MODIFIED: &str =
    "http://fedora.info/definitions/v4/repository#lastModified";
/// Server-managed: containing resource.
pub const FEDORA_HAS_PARENT: &str = "http://fedora.info/definitions/v4/repository#hasParent";

pub const DC_TITLE: &str = "http://purl.org/dc/terms/title";
pub const DC_CREATOR: &str = "http://purl.org/dc/terms/creator";
pub const DC_SUBJECT: &str = "http://purl.org/dc/terms/subject";
pub const DC_RELATION: &str = "http://purl.org/dc/terms/relation";

/// Predicates only the store may write.
pub const SERVER_MANAGED: &[&str] = &[FEDORA_CREATED, FEDORA_LAST_MODIFIED, FEDORA_HAS_PARENT];

pub fn is_server_managed(predicate: &str) -> bool {
    SERVER_MANAGED.contains(&predicate)
}
