use crate::http::{GraphqlResponse, HttpClient};
use anyhow::Result;

pub const DETECTION_QUERY: &str = "query { __typename }";

/// Sends the detection query to `url`.
pub async fn probe(client: &HttpClient, url: &str) -> Result<GraphqlResponse> {
    client.post_graphql(url, DETECTION_QUERY).await
}

/// Strict signature check: the response answered the detection query with a
/// recognized root type, or rejected it the way a GraphQL server does
/// (structured errors carrying locations/extensions).
pub fn has_graphql_signature(response: &GraphqlResponse) -> bool {
    if let Some(data) = response.get_data() {
        if let Some(name) = data.get("__typename").and_then(|t| t.as_str()) {
            let valid_roots = ["Query", "QueryRoot", "query_root", "Root"];
            if valid_roots.contains(&name) {
                return true;
            }
        }
    }

    if let Some(errors) = response.get_errors().and_then(|e| e.as_array()) {
        for error in errors {
            if error.get("locations").is_some() || error.get("extensions").is_some() {
                return true;
            }
        }
    }

    false
}

/// Loose check used for recall: anything JSON-shaped like a GraphQL reply
/// counts, a plain 200/404 page does not.
pub fn looks_like_graphql(response: &GraphqlResponse) -> bool {
    response.status != 404
        && response.is_json()
        && (response.get_data().is_some() || response.get_errors().is_some())
}
