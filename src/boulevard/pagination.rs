use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::client::ClientError;
use super::types::Connection;

/// Safety ceilings for a pagination walk. Hitting either stops the walk and
/// returns what was gathered; a misbehaving upstream must not be able to
/// drive unbounded work.
#[derive(Debug, Clone)]
pub struct PageLimits {
    pub max_pages: usize,
    pub max_nodes: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_nodes: 5_000,
        }
    }
}

impl PageLimits {
    pub fn new(max_pages: usize, max_nodes: usize) -> Self {
        Self {
            max_pages,
            max_nodes,
        }
    }
}

/// One decoded page of a connection.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub nodes: Vec<T>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Locate the connection object inside `data`.
///
/// The known field name wins; otherwise the single non-metadata top-level
/// field is assumed to be the connection.
fn extract_connection<'a>(data: &'a Value, field: &str) -> Result<&'a Value, ClientError> {
    let obj = data
        .as_object()
        .ok_or_else(|| ClientError::Protocol("response data is not an object".into()))?;

    if let Some(value) = obj.get(field) {
        return Ok(value);
    }

    let mut candidates = obj.iter().filter(|(key, _)| !key.starts_with("__"));
    match (candidates.next(), candidates.next()) {
        (Some((name, value)), None) => {
            tracing::debug!(
                expected = field,
                found = %name,
                "Connection returned under a different field name"
            );
            Ok(value)
        }
        _ => Err(ClientError::Protocol(format!(
            "no connection field `{field}` in response data"
        ))),
    }
}

/// Decode one page out of a GraphQL `data` object.
///
/// Nodes that fail to decode are skipped with a warning rather than failing
/// the page; a malformed connection envelope is a protocol error.
pub(crate) fn parse_page<T: DeserializeOwned>(
    data: &Value,
    field: &str,
) -> Result<Page<T>, ClientError> {
    let connection = extract_connection(data, field)?;
    let raw: Connection<Value> = serde_json::from_value(connection.clone())
        .map_err(|e| ClientError::Protocol(format!("malformed connection `{field}`: {e}")))?;

    let mut nodes = Vec::with_capacity(raw.edges.len());
    for edge in raw.edges {
        match serde_json::from_value::<T>(edge.node) {
            Ok(node) => nodes.push(node),
            Err(e) => {
                tracing::warn!(field, error = %e, "Skipping node that failed to decode");
            }
        }
    }

    Ok(Page {
        nodes,
        has_next_page: raw.page_info.has_next_page,
        end_cursor: raw.page_info.end_cursor,
    })
}

/// Walk a cursor-paginated connection to exhaustion, accumulating nodes in
/// encounter order.
///
/// Stops without error when: the upstream reports no further page; the
/// upstream claims a next page but omits the cursor (protocol-violation
/// guard); either safety ceiling is reached; or a page mid-walk comes back
/// malformed (the nodes gathered so far are returned). A failure on the
/// very first page propagates — there is nothing partial to salvage.
pub async fn collect_all<T, F, Fut>(mut fetch: F, limits: &PageLimits) -> Result<Vec<T>, ClientError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ClientError>>,
{
    let mut nodes: Vec<T> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = match fetch(cursor.clone()).await {
            Ok(page) => page,
            Err(ClientError::Protocol(msg)) if pages > 0 => {
                tracing::warn!(
                    pages,
                    nodes = nodes.len(),
                    error = %msg,
                    "Malformed page mid-walk — returning partial results"
                );
                break;
            }
            Err(e) => return Err(e),
        };

        pages += 1;
        nodes.extend(page.nodes);

        if !page.has_next_page {
            break;
        }
        let Some(next) = page.end_cursor else {
            tracing::warn!(
                pages,
                nodes = nodes.len(),
                "hasNextPage=true with no endCursor — halting pagination"
            );
            break;
        };
        cursor = Some(next);

        if pages >= limits.max_pages {
            tracing::warn!(
                pages,
                nodes = nodes.len(),
                "Page ceiling reached — stopping with partial results"
            );
            break;
        }
        if nodes.len() >= limits.max_nodes {
            tracing::warn!(
                pages,
                nodes = nodes.len(),
                "Node ceiling reached — stopping with partial results"
            );
            break;
        }
    }

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_page_reads_known_field() {
        let data = json!({
            "orders": {
                "edges": [{"node": 1}, {"node": 2}],
                "pageInfo": {"hasNextPage": true, "endCursor": "abc"}
            }
        });
        let page: Page<i64> = parse_page(&data, "orders").unwrap();
        assert_eq!(page.nodes, vec![1, 2]);
        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn parse_page_falls_back_to_single_top_level_field() {
        let data = json!({
            "closedOrders": {
                "edges": [{"node": 7}],
                "pageInfo": {"hasNextPage": false}
            }
        });
        let page: Page<i64> = parse_page(&data, "orders").unwrap();
        assert_eq!(page.nodes, vec![7]);
        assert!(!page.has_next_page);
    }

    #[test]
    fn parse_page_rejects_ambiguous_fallback() {
        let data = json!({
            "a": {"edges": [], "pageInfo": {"hasNextPage": false}},
            "b": {"edges": [], "pageInfo": {"hasNextPage": false}}
        });
        assert!(matches!(
            parse_page::<i64>(&data, "orders"),
            Err(ClientError::Protocol(_))
        ));
    }

    #[test]
    fn parse_page_skips_undecodable_nodes() {
        let data = json!({
            "orders": {
                "edges": [{"node": 1}, {"node": "not-a-number"}, {"node": 3}],
                "pageInfo": {"hasNextPage": false}
            }
        });
        let page: Page<i64> = parse_page(&data, "orders").unwrap();
        assert_eq!(page.nodes, vec![1, 3]);
    }

    #[test]
    fn parse_page_missing_page_info_is_protocol_error() {
        let data = json!({"orders": {"edges": []}});
        assert!(matches!(
            parse_page::<i64>(&data, "orders"),
            Err(ClientError::Protocol(_))
        ));
    }
}
