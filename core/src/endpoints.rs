//! Endpoint paths and URL encoding.
//!
//! Repository paths and node ids are percent-encoded per segment before they
//! are spliced into a URL. Query strings go through `serde_urlencoded`, which
//! keeps parameters in field declaration order.

use serde::Serialize;

use crate::error::ApiError;

/// CMIS 1.1 browser binding, rooted at the repository root folder.
pub const CMIS_ROOT: &str = "/alfresco/api/-default-/public/cmis/versions/1.1/browser/root";

/// Public REST API v1.
pub const REST_API: &str = "/alfresco/api/-default-/public/alfresco/versions/1";

/// Legacy Share web script creating folder hierarchies.
pub const MKDIR: &str = "/alfresco/s/slingshot/doclib2/mkdir";

/// Page size used when listing the trashcan.
pub const DELETED_NODES_MAX_ITEMS: u32 = 10_000;

pub const SELECTOR_CHILDREN: &str = "children";
pub const SELECTOR_OBJECT: &str = "object";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CmisQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmisselector: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeletedNodesQuery {
    pub include: &'static str,
    pub max_items: u32,
}

pub(crate) fn encode_query<Q: Serialize>(query: &Q) -> Result<String, ApiError> {
    serde_urlencoded::to_string(query).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Percent-encode a `/`-separated repository path. Empty segments (leading,
/// trailing or doubled slashes) are dropped.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-encode a node id as a single path segment.
pub fn encode_id(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

pub(crate) fn cmis_url(base_url: &str, path: &str, query: &str) -> String {
    let encoded = encode_path(path);
    if encoded.is_empty() {
        format!("{base_url}{CMIS_ROOT}?{query}")
    } else {
        format!("{base_url}{CMIS_ROOT}/{encoded}?{query}")
    }
}

pub(crate) fn node_url(base_url: &str, node_id: &str) -> String {
    format!("{base_url}{REST_API}/nodes/{}", encode_id(node_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_are_encoded_individually() {
        assert_eq!(encode_path("Sites/my site/documentLibrary"), "Sites/my%20site/documentLibrary");
        assert_eq!(encode_path("/a//b/"), "a/b");
        assert_eq!(encode_path("a?b#c"), "a%3Fb%23c");
    }

    #[test]
    fn id_slashes_are_encoded() {
        assert_eq!(encode_id("a/b"), "a%2Fb");
        assert_eq!(encode_id("1a2b-3c"), "1a2b-3c");
    }

    #[test]
    fn cmis_query_keeps_field_order() {
        let q = CmisQuery { max_items: Some(5), cmisselector: Some(SELECTOR_CHILDREN) };
        assert_eq!(encode_query(&q).unwrap(), "maxItems=5&cmisselector=children");
        let q = CmisQuery { max_items: None, cmisselector: Some(SELECTOR_OBJECT) };
        assert_eq!(encode_query(&q).unwrap(), "cmisselector=object");
    }

    #[test]
    fn empty_path_targets_root() {
        assert_eq!(
            cmis_url("http://h", "/", "maxItems=1"),
            format!("http://h{CMIS_ROOT}?maxItems=1")
        );
    }
}
