//! SQLite-backed LDP resource store.
//!
//! # Responsibility
//! - Persist resource statements and concurrency metadata.
//! - Behave like an LDP server towards clients: mint subjects, own the
//!   server-managed predicates, recompute ETags on every write.
//!
//! # Invariants
//! - Every write assigns a fresh ETag to the written resource.
//! - Adding or removing a child assigns a fresh ETag to its parent, so a
//!   parent ETag cached before the child write goes stale.
//! - Client-supplied server-managed statements are discarded.
//! - Delete removes the resource and every resource beneath its URI.

use super::resource_store::{ResourceStore, StoreError, StoreResult};
use crate::model::resource::{CachedResponse, Graph, Resource, Term};
use crate::vocab::{is_server_managed, FEDORA_CREATED, FEDORA_HAS_PARENT, FEDORA_LAST_MODIFIED};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const RESOURCE_SELECT_SQL: &str = "SELECT
    uri,
    container,
    etag,
    created_at,
    last_modified
FROM resources";

struct ResourceRow {
    uri: String,
    container: Option<String>,
    etag: String,
    created_at: i64,
    last_modified: i64,
}

/// Embedded store over a migrated SQLite connection.
pub struct SqliteResourceStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteResourceStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ResourceStore for SqliteResourceStore<'_> {
    fn get(&self, uri: &str) -> StoreResult<Resource> {
        let row = load_row(self.conn, uri)?.ok_or_else(|| StoreError::NotFound(uri.to_string()))?;
        let graph = load_graph(self.conn, &row)?;
        debug!("event=store_get module=store status=ok uri={uri}");
        Ok(Resource::retrieved(
            row.uri,
            graph,
            CachedResponse {
                etag: row.etag,
                last_modified: row.last_modified,
            },
        ))
    }

    fn create(&self, resource: &Resource) -> StoreResult<Resource> {
        let (uri, container) = match (resource.subject(), resource.container()) {
            (Some(subject), _) => (subject.to_string(), parent_of(subject)),
            (None, Some(container)) => {
                let container = container.trim_end_matches('/').to_string();
                (format!("{container}/{}", Uuid::new_v4()), Some(container))
            }
            (None, None) => {
                return Err(StoreError::InvalidData(
                    "resource has neither a subject nor a container".to_string(),
                ));
            }
        };

        let tx = self.conn.unchecked_transaction()?;
        if load_row(&tx, &uri)?.is_some() {
            return Err(StoreError::AlreadyExists(uri));
        }

        let now = now_ms();
        tx.execute(
            "INSERT INTO resources (uri, container, etag, created_at, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?4);",
            params![uri, container, new_etag(), now],
        )?;
        write_statements(&tx, &uri, resource.graph())?;
        if let Some(container) = container.as_deref() {
            touch(&tx, container, now)?;
        }
        tx.commit()?;

        info!("event=store_create module=store status=ok uri={uri}");
        self.get(&uri)
    }

    fn update(&self, resource: &Resource, etag: Option<&str>) -> StoreResult<Resource> {
        let uri = resource.subject().ok_or_else(|| {
            StoreError::InvalidData("cannot update a resource without a subject".to_string())
        })?;

        let tx = self.conn.unchecked_transaction()?;
        let row = load_row(&tx, uri)?.ok_or_else(|| StoreError::NotFound(uri.to_string()))?;
        if let Some(expected) = etag {
            if expected != row.etag {
                warn!("event=store_update module=store status=conflict uri={uri}");
                return Err(StoreError::Conflict {
                    uri: uri.to_string(),
                    expected: expected.to_string(),
                    actual: row.etag,
                });
            }
        }

        write_statements(&tx, uri, resource.graph())?;
        touch(&tx, uri, now_ms())?;
        tx.commit()?;

        info!(
            "event=store_update module=store status=ok uri={uri} conditional={}",
            etag.is_some()
        );
        self.get(uri)
    }

    fn delete(&self, uri: &str) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let row = load_row(&tx, uri)?.ok_or_else(|| StoreError::NotFound(uri.to_string()))?;

        let removed = tx.execute(
            "DELETE FROM resources
             WHERE uri = ?1
                OR substr(uri, 1, length(?1) + 1) = ?1 || '/';",
            [uri],
        )?;
        if let Some(container) = row.container.as_deref() {
            touch(&tx, container, now_ms())?;
        }
        tx.commit()?;

        info!("event=store_delete module=store status=ok uri={uri} removed={removed}");
        Ok(())
    }
}

fn load_row(conn: &Connection, uri: &str) -> StoreResult<Option<ResourceRow>> {
    let row = conn
        .query_row(
            &format!("{RESOURCE_SELECT_SQL} WHERE uri = ?1;"),
            [uri],
            |row| {
                Ok(ResourceRow {
                    uri: row.get("uri")?,
                    container: row.get("container")?,
                    etag: row.get("etag")?,
                    created_at: row.get("created_at")?,
                    last_modified: row.get("last_modified")?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

fn load_graph(conn: &Connection, row: &ResourceRow) -> StoreResult<Graph> {
    let mut stmt = conn.prepare(
        "SELECT predicate, kind, value
         FROM statements
         WHERE uri = ?1
         ORDER BY predicate ASC, position ASC;",
    )?;
    let mut rows = stmt.query([row.uri.as_str()])?;

    let mut graph = Graph::new();
    while let Some(statement) = rows.next()? {
        let predicate: String = statement.get("predicate")?;
        let kind: String = statement.get("kind")?;
        let value: String = statement.get("value")?;
        let term = match kind.as_str() {
            "literal" => Term::Literal(value),
            "uri" => Term::Uri(value),
            other => {
                return Err(StoreError::InvalidData(format!(
                    "invalid statement kind `{other}` in statements.kind"
                )));
            }
        };
        graph.push(predicate, term);
    }

    graph.push(FEDORA_CREATED, Term::Literal(row.created_at.to_string()));
    graph.push(
        FEDORA_LAST_MODIFIED,
        Term::Literal(row.last_modified.to_string()),
    );
    if let Some(container) = row.container.as_deref() {
        graph.push(FEDORA_HAS_PARENT, Term::uri(container));
    }
    Ok(graph)
}

fn write_statements(conn: &Connection, uri: &str, graph: &Graph) -> StoreResult<()> {
    conn.execute("DELETE FROM statements WHERE uri = ?1;", [uri])?;

    let mut stmt = conn.prepare(
        "INSERT INTO statements (uri, predicate, position, kind, value)
         VALUES (?1, ?2, ?3, ?4, ?5);",
    )?;
    for predicate in graph.predicates().filter(|p| !is_server_managed(p)) {
        for (position, term) in graph.objects(predicate).iter().enumerate() {
            let (kind, value) = match term {
                Term::Literal(value) => ("literal", value.as_str()),
                Term::Uri(value) => ("uri", value.as_str()),
            };
            stmt.execute(params![uri, predicate, position as i64, kind, value])?;
        }
    }
    Ok(())
}

/// Assigns a fresh ETag; a no-op when `uri` has no row (implicit root).
fn touch(conn: &Connection, uri: &str, now: i64) -> StoreResult<()> {
    conn.execute(
        "UPDATE resources SET etag = ?1, last_modified = ?2 WHERE uri = ?3;",
        params![new_etag(), now, uri],
    )?;
    Ok(())
}

fn parent_of(uri: &str) -> Option<String> {
    let (parent, _) = uri.rsplit_once('/')?;
    if parent.ends_with('/') || !parent.contains("://") {
        return None;
    }
    Some(parent.to_string())
}

fn new_etag() -> String {
    format!("W/\"{}\"", Uuid::new_v4().simple())
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
