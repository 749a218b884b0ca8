//! Stateless request builder and response parser for the repository APIs.
//!
//! # Design
//! `AlfrescoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming the matching `HttpResponse`. Nothing here performs I/O; see
//! [`crate::ContentServiceClient`] for the one-call façade.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::endpoints::{
    self, CmisQuery, DeletedNodesQuery, DELETED_NODES_MAX_ITEMS, MKDIR, REST_API, SELECTOR_CHILDREN,
    SELECTOR_OBJECT,
};
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{props, CmisObjects, Copy, CreateFolders, Node, NodeRes, NodesRes, SingleObject};

const JSON: &str = "application/json";

/// Synchronous, stateless client for the CMIS browser binding and the public
/// REST API.
#[derive(Debug, Clone)]
pub struct AlfrescoClient {
    base_url: String,
}

impl AlfrescoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List `path` with `maxItems=limit`; the parent id of the first child is
    /// the id of the folder at `path`.
    pub fn build_resolve_node_id(&self, path: &str, limit: u32) -> ApiResult<HttpRequest> {
        let query = endpoints::encode_query(&CmisQuery { max_items: Some(limit), cmisselector: None })?;
        Ok(get(endpoints::cmis_url(&self.base_url, path, &query)))
    }

    pub fn build_list_deleted_nodes(&self) -> ApiResult<HttpRequest> {
        let query = endpoints::encode_query(&DeletedNodesQuery {
            include: "properties",
            max_items: DELETED_NODES_MAX_ITEMS,
        })?;
        Ok(get(format!("{}{REST_API}/deleted-nodes?{query}", self.base_url)))
    }

    pub fn build_list_children(&self, path: &str, limit: u32) -> ApiResult<HttpRequest> {
        let query = endpoints::encode_query(&CmisQuery {
            max_items: Some(limit),
            cmisselector: Some(SELECTOR_CHILDREN),
        })?;
        Ok(get(endpoints::cmis_url(&self.base_url, path, &query)))
    }

    /// `_limit` is accepted for signature compatibility and is not sent: the
    /// object selector returns a single object and takes no page size.
    pub fn build_get_node_by_path(&self, path: &str, _limit: u32) -> ApiResult<HttpRequest> {
        let query = endpoints::encode_query(&CmisQuery { max_items: None, cmisselector: Some(SELECTOR_OBJECT) })?;
        Ok(get(endpoints::cmis_url(&self.base_url, path, &query)))
    }

    pub fn build_get_node(&self, node_id: &str) -> HttpRequest {
        get(endpoints::node_url(&self.base_url, node_id))
    }

    pub fn build_delete_node(&self, node_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: endpoints::node_url(&self.base_url, node_id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_copy_node(&self, source_id: &str, destination: &Copy) -> ApiResult<HttpRequest> {
        let body = serde_json::to_string(destination).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/copy", endpoints::node_url(&self.base_url, source_id)),
            headers: vec![
                ("accept".to_string(), JSON.to_string()),
                ("content-type".to_string(), JSON.to_string()),
            ],
            body: Some(body),
        })
    }

    pub fn build_create_folder_template(&self, node_id: &str, paths: &[String]) -> ApiResult<HttpRequest> {
        let body = serde_json::to_string(&CreateFolders::under(node_id, paths))
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{MKDIR}", self.base_url),
            headers: vec![("content-type".to_string(), JSON.to_string())],
            body: Some(body),
        })
    }

    /// `path` is only used to describe an empty listing in the error.
    pub fn parse_resolve_node_id(&self, path: &str, response: HttpResponse) -> ApiResult<String> {
        let listing: CmisObjects = decode(response)?;
        let first = listing.iter().next().ok_or_else(|| ApiError::NoObjects { path: path.to_string() })?;
        first
            .parent_id()
            .map(str::to_string)
            .ok_or_else(|| ApiError::MissingProperty { property: props::PARENT_ID.to_string() })
    }

    pub fn parse_list_deleted_nodes(&self, response: HttpResponse) -> ApiResult<NodesRes> {
        decode(response)
    }

    pub fn parse_list_children(&self, response: HttpResponse) -> ApiResult<CmisObjects> {
        decode(response)
    }

    pub fn parse_get_node_by_path(&self, response: HttpResponse) -> ApiResult<SingleObject> {
        decode(response)
    }

    pub fn parse_get_node(&self, response: HttpResponse) -> ApiResult<Node> {
        let res: NodeRes = decode(response)?;
        Ok(res.entry)
    }

    pub fn parse_delete_node(&self, response: HttpResponse) -> ApiResult<()> {
        check_status(&response)
    }

    pub fn parse_copy_node(&self, response: HttpResponse) -> ApiResult<NodeRes> {
        decode(response)
    }

    pub fn parse_create_folder_template(&self, response: HttpResponse) -> ApiResult<()> {
        check_status(&response)
    }
}

fn get(url: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url,
        headers: Vec::new(),
        body: None,
    }
}

/// Any 2xx is success; everything else carries status and body back.
fn check_status(response: &HttpResponse) -> ApiResult<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> ApiResult<T> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
