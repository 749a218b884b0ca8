//! One-call façade over `AlfrescoClient` and a host-supplied transport.
//!
//! Each operation is exactly one round-trip: build, execute, parse. Transport
//! and status failures are returned untouched and never retried.

use tracing::debug;

use crate::client::AlfrescoClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CmisObjects, Copy, Node, NodeRes, NodesRes, SingleObject};

/// Executes plain-data HTTP requests.
///
/// Implement this with any HTTP library. Non-2xx responses must be returned
/// as `Ok`; the client interprets status codes itself. Authentication and
/// timeouts are the implementation's concern.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Repository client bound to a transport.
#[derive(Debug, Clone)]
pub struct ContentServiceClient<T> {
    client: AlfrescoClient,
    transport: T,
}

impl<T: Transport> ContentServiceClient<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        Self {
            client: AlfrescoClient::from_config(config),
            transport,
        }
    }

    pub fn client(&self) -> &AlfrescoClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request).map_err(ApiError::Transport)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    /// Id of the folder at `path`, taken from the parent id of its first
    /// child. An empty folder yields `ApiError::NoObjects`.
    pub fn resolve_node_id(&self, path: &str, limit: u32) -> ApiResult<String> {
        let response = self.send(self.client.build_resolve_node_id(path, limit)?)?;
        self.client.parse_resolve_node_id(path, response)
    }

    /// Trashcan contents, first 10000 entries with their properties.
    pub fn list_deleted_nodes(&self) -> ApiResult<NodesRes> {
        let response = self.send(self.client.build_list_deleted_nodes()?)?;
        self.client.parse_list_deleted_nodes(response)
    }

    pub fn list_children(&self, path: &str, limit: u32) -> ApiResult<CmisObjects> {
        let response = self.send(self.client.build_list_children(path, limit)?)?;
        self.client.parse_list_children(response)
    }

    /// `limit` is not sent; see [`AlfrescoClient::build_get_node_by_path`].
    pub fn get_node_by_path(&self, path: &str, limit: u32) -> ApiResult<SingleObject> {
        let response = self.send(self.client.build_get_node_by_path(path, limit)?)?;
        self.client.parse_get_node_by_path(response)
    }

    pub fn get_node(&self, node_id: &str) -> ApiResult<Node> {
        let response = self.send(self.client.build_get_node(node_id))?;
        self.client.parse_get_node(response)
    }

    pub fn delete_node(&self, node_id: &str) -> ApiResult<()> {
        let response = self.send(self.client.build_delete_node(node_id))?;
        self.client.parse_delete_node(response)
    }

    pub fn copy_node(&self, source_id: &str, destination: &Copy) -> ApiResult<NodeRes> {
        let response = self.send(self.client.build_copy_node(source_id, destination)?)?;
        self.client.parse_copy_node(response)
    }

    /// Create every folder in `paths` (each may be nested, `a/b/c`) below the
    /// node `node_id`.
    pub fn create_folder_template(&self, node_id: &str, paths: &[String]) -> ApiResult<()> {
        let response = self.send(self.client.build_create_folder_template(node_id, paths)?)?;
        self.client.parse_create_folder_template(response)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::http::HttpMethod;

    /// Replays canned responses and records every request it was given.
    #[derive(Default)]
    struct Recorder {
        requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    }

    impl Recorder {
        fn replying(status: u16, body: &str) -> Self {
            let recorder = Self::default();
            recorder.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            recorder
        }

        fn failing(message: &str) -> Self {
            let recorder = Self::default();
            recorder.responses.borrow_mut().push_back(Err(message.to_string().into()));
            recorder
        }

        fn last(&self) -> HttpRequest {
            self.requests.borrow().last().cloned().unwrap()
        }
    }

    impl Transport for Recorder {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push(request);
            self.responses.borrow_mut().pop_front().expect("no canned response left")
        }
    }

    fn service(transport: &Recorder) -> ContentServiceClient<&Recorder> {
        let config = ClientConfig::new("http://repo:8080").unwrap();
        ContentServiceClient::new(&config, transport)
    }

    #[test]
    fn resolve_node_id_issues_one_get() {
        let transport = Recorder::replying(
            200,
            r#"{"objects":[{"object":{"properties":{"cmis:parentId":{"value":"f1"}}}}],"hasMoreItems":false,"numItems":1}"#,
        );
        let id = service(&transport).resolve_node_id("Sites/hr", 1).unwrap();
        assert_eq!(id, "f1");
        assert_eq!(transport.requests.borrow().len(), 1);
        assert_eq!(transport.last().query(), Some("maxItems=1"));
    }

    #[test]
    fn resolve_node_id_empty_folder_does_not_panic() {
        let transport = Recorder::replying(200, r#"{"objects":[],"hasMoreItems":false,"numItems":0}"#);
        let err = service(&transport).resolve_node_id("Sites/hr", 1).unwrap_err();
        assert!(matches!(err, ApiError::NoObjects { .. }));
    }

    #[test]
    fn list_children_query_is_exact() {
        let transport = Recorder::replying(200, r#"{"objects":[],"hasMoreItems":false,"numItems":0}"#);
        let children = service(&transport).list_children("Sites/hr", 7).unwrap();
        assert!(children.is_empty());
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.query(), Some("maxItems=7&cmisselector=children"));
        assert!(req.url.starts_with(
            "http://repo:8080/alfresco/api/-default-/public/cmis/versions/1.1/browser/root/Sites/hr?"
        ));
    }

    #[test]
    fn get_node_by_path_decodes_object() {
        let transport = Recorder::replying(
            200,
            r#"{"properties":{"cmis:objectId":{"value":"o1"},"cmis:name":{"value":"hr"}}}"#,
        );
        let object = service(&transport).get_node_by_path("Sites/hr", 10).unwrap();
        assert_eq!(object.object_id(), Some("o1"));
        assert_eq!(transport.last().query(), Some("cmisselector=object"));
    }

    #[test]
    fn get_node_roundtrips_entry() {
        let entry = serde_json::json!({
            "id": "x",
            "name": "notes.md",
            "nodeType": "cm:content",
            "isFolder": false,
            "isFile": true,
            "modifiedByUser": {"id": "jdoe", "displayName": "J Doe"},
            "aspectNames": ["cm:auditable"],
            "properties": {"cm:versionLabel": "1.0"}
        });
        let transport = Recorder::replying(200, &serde_json::json!({ "entry": entry }).to_string());
        let node = service(&transport).get_node("x").unwrap();
        assert_eq!(serde_json::to_value(&node).unwrap(), entry);
    }

    #[test]
    fn delete_node_status_handling() {
        let transport = Recorder::replying(204, "");
        service(&transport).delete_node("n1").unwrap();
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());

        let transport = Recorder::replying(404, "missing");
        let err = service(&transport).delete_node("n1").unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 404, .. }));
    }

    #[test]
    fn copy_node_posts_json() {
        let transport = Recorder::replying(201, r#"{"entry":{"id":"n2","name":"a"}}"#);
        let res = service(&transport).copy_node("n1", &Copy::new("p1")).unwrap();
        assert_eq!(res.entry.id, "n2");
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Post);
        assert!(req.url.ends_with("/nodes/n1/copy"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"targetParentId":"p1"}"#));
    }

    #[test]
    fn create_folder_template_posts_body() {
        let transport = Recorder::replying(200, "{}");
        service(&transport)
            .create_folder_template("abc", &["a".to_string(), "b".to_string()])
            .unwrap();
        let req = transport.last();
        assert!(req.url.ends_with("/alfresco/s/slingshot/doclib2/mkdir"));
        assert_eq!(
            req.body.as_deref(),
            Some(r#"{"destination":"workspace://SpacesStore/abc","paths":["a","b"]}"#)
        );
    }

    #[test]
    fn transport_errors_propagate() {
        let transport = Recorder::failing("connection refused");
        let err = service(&transport).list_deleted_nodes().unwrap_err();
        match err {
            ApiError::Transport(source) => assert_eq!(source.to_string(), "connection refused"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
