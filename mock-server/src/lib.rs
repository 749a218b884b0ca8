use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const CMIS_ROOT: &str = "/alfresco/api/-default-/public/cmis/versions/1.1/browser/root";
pub const REST_API: &str = "/alfresco/api/-default-/public/alfresco/versions/1";
pub const MKDIR: &str = "/alfresco/s/slingshot/doclib2/mkdir";

/// Id of the seeded repository root ("Company Home").
pub const ROOT_ID: &str = "00000000-0000-0000-0000-000000000000";
pub const ROOT_NAME: &str = "Company Home";

const WORKSPACE_STORE: &str = "workspace://SpacesStore/";
const TIMESTAMP: &str = "2024-01-01T00:00:00.000+0000";
const DEFAULT_MAX_ITEMS: usize = 100;

#[derive(Clone, Debug)]
pub struct StoredNode {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub is_folder: bool,
    pub properties: Map<String, Value>,
}

/// In-memory node tree plus trashcan.
#[derive(Debug)]
pub struct Repository {
    nodes: HashMap<String, StoredNode>,
    trashcan: Vec<StoredNode>,
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository {
    pub fn new() -> Self {
        let root = StoredNode {
            id: ROOT_ID.to_string(),
            name: ROOT_NAME.to_string(),
            parent_id: None,
            is_folder: true,
            properties: Map::new(),
        };
        Self {
            nodes: HashMap::from([(root.id.clone(), root)]),
            trashcan: Vec::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&StoredNode> {
        self.nodes.get(id)
    }

    pub fn trashcan(&self) -> &[StoredNode] {
        &self.trashcan
    }

    /// Children of `parent_id`, sorted by name.
    pub fn children(&self, parent_id: &str) -> Vec<&StoredNode> {
        let mut children: Vec<_> = self
            .nodes
            .values()
            .filter(|n| n.parent_id.as_deref() == Some(parent_id))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    pub fn child_named(&self, parent_id: &str, name: &str) -> Option<&StoredNode> {
        self.nodes
            .values()
            .find(|n| n.parent_id.as_deref() == Some(parent_id) && n.name == name)
    }

    /// Walk `path` by name from the root.
    pub fn resolve(&self, path: &str) -> Option<&StoredNode> {
        let mut current = self.nodes.get(ROOT_ID)?;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = self.child_named(&current.id, segment)?;
        }
        Some(current)
    }

    /// Slash-separated path of a node; the root is `/`.
    pub fn path_of(&self, node: &StoredNode) -> String {
        let mut names = Vec::new();
        let mut current = node;
        while let Some(parent) = current.parent_id.as_deref().and_then(|id| self.nodes.get(id)) {
            names.push(current.name.as_str());
            current = parent;
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    fn insert(&mut self, parent_id: &str, name: &str, is_folder: bool) -> String {
        let node = StoredNode {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            parent_id: Some(parent_id.to_string()),
            is_folder,
            properties: Map::new(),
        };
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        id
    }

    /// Id of the folder `name` under `parent_id`, created when missing.
    pub fn ensure_folder(&mut self, parent_id: &str, name: &str) -> String {
        if let Some(existing) = self.child_named(parent_id, name) {
            return existing.id.clone();
        }
        let id = self.insert(parent_id, name, true);
        info!(%id, parent = parent_id, name, "created folder");
        id
    }

    /// Add a document; returns `None` if the parent is unknown or not a folder.
    pub fn add_document(&mut self, parent_id: &str, name: &str, properties: Map<String, Value>) -> Option<String> {
        if !self.nodes.get(parent_id)?.is_folder {
            return None;
        }
        let id = self.insert(parent_id, name, false);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.properties = properties;
        }
        Some(id)
    }

    fn is_within(&self, ancestor_id: &str, node_id: &str) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == ancestor_id {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent_id.as_deref());
        }
        false
    }

    fn subtree_ids(&self, id: &str) -> Vec<String> {
        let mut ids = vec![id.to_string()];
        let mut i = 0;
        while i < ids.len() {
            let parent = ids[i].clone();
            ids.extend(self.children(&parent).into_iter().map(|n| n.id.clone()));
            i += 1;
        }
        ids
    }

    /// Move a node to the trashcan, dropping its descendants.
    pub fn delete(&mut self, id: &str) -> Result<(), StatusCode> {
        if id == ROOT_ID {
            return Err(StatusCode::FORBIDDEN);
        }
        if !self.nodes.contains_key(id) {
            return Err(StatusCode::NOT_FOUND);
        }
        let ids = self.subtree_ids(id);
        let mut top = None;
        for removed in ids {
            let node = self.nodes.remove(&removed);
            if removed == id {
                top = node;
            }
        }
        self.trashcan.extend(top);
        info!(%id, "deleted node");
        Ok(())
    }

    /// Recursively copy `source_id` under `target_id`.
    pub fn copy(&mut self, source_id: &str, target_id: &str, name: Option<&str>) -> Result<String, StatusCode> {
        let source = self.nodes.get(source_id).ok_or(StatusCode::NOT_FOUND)?.clone();
        let target = self.nodes.get(target_id).ok_or(StatusCode::NOT_FOUND)?;
        if !target.is_folder || self.is_within(source_id, target_id) {
            return Err(StatusCode::BAD_REQUEST);
        }
        let name = name.unwrap_or(&source.name);
        if self.child_named(target_id, name).is_some() {
            return Err(StatusCode::CONFLICT);
        }
        let copy_id = self.insert(target_id, name, source.is_folder);
        if let Some(copy) = self.nodes.get_mut(&copy_id) {
            copy.properties = source.properties.clone();
        }
        let children: Vec<_> = self.children(source_id).into_iter().map(|n| n.id.clone()).collect();
        for child in children {
            self.copy(&child, &copy_id, None)?;
        }
        info!(source = source_id, target = target_id, id = %copy_id, "copied node");
        Ok(copy_id)
    }

    fn cmis_object(&self, node: &StoredNode) -> Value {
        let (base_type, object_type) = if node.is_folder {
            ("cmis:folder", "cmis:folder")
        } else {
            ("cmis:document", "cmis:document")
        };
        let mut properties = Map::new();
        let mut put = |id: &str, kind: &str, value: Value| {
            properties.insert(
                id.to_string(),
                json!({
                    "id": id,
                    "localName": id.trim_start_matches("cmis:"),
                    "displayName": id.trim_start_matches("cmis:"),
                    "queryName": id,
                    "type": kind,
                    "cardinality": "single",
                    "value": value,
                }),
            );
        };
        put("cmis:objectId", "id", json!(node.id));
        put("cmis:name", "string", json!(node.name));
        put("cmis:parentId", "id", json!(node.parent_id));
        put("cmis:baseTypeId", "id", json!(base_type));
        put("cmis:objectTypeId", "id", json!(object_type));
        if node.is_folder {
            put("cmis:path", "string", json!(self.path_of(node)));
        }
        json!({ "properties": properties })
    }

    fn rest_entry(&self, node: &StoredNode, with_properties: bool) -> Value {
        let mut entry = json!({
            "id": node.id,
            "name": node.name,
            "nodeType": if node.is_folder { "cm:folder" } else { "cm:content" },
            "isFolder": node.is_folder,
            "isFile": !node.is_folder,
            "createdAt": TIMESTAMP,
            "modifiedAt": TIMESTAMP,
            "createdByUser": {"id": "admin", "displayName": "Administrator"},
            "modifiedByUser": {"id": "admin", "displayName": "Administrator"},
        });
        if let Some(parent) = &node.parent_id {
            entry["parentId"] = json!(parent);
        }
        if with_properties {
            entry["properties"] = Value::Object(node.properties.clone());
        }
        entry
    }
}

pub type Db = Arc<RwLock<Repository>>;

pub fn app() -> Router {
    router(Repository::new())
}

pub fn router(repository: Repository) -> Router {
    let db: Db = Arc::new(RwLock::new(repository));
    Router::new()
        .route(CMIS_ROOT, get(cmis_root))
        .route(&format!("{CMIS_ROOT}/{{*path}}"), get(cmis_path))
        .route(&format!("{REST_API}/deleted-nodes"), get(deleted_nodes))
        .route(&format!("{REST_API}/nodes/{{id}}"), get(get_node).delete(delete_node))
        .route(&format!("{REST_API}/nodes/{{id}}/copy"), post(copy_node))
        .route(MKDIR, post(mkdir))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn cmis_error(status: StatusCode, exception: &str, message: impl Into<String>) -> Response {
    (status, Json(json!({ "exception": exception, "message": message.into() }))).into_response()
}

fn rest_error(status: StatusCode, summary: impl Into<String>) -> Response {
    let body = json!({ "error": { "statusCode": status.as_u16(), "briefSummary": summary.into() } });
    (status, Json(body)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct CmisParams {
    #[serde(rename = "maxItems")]
    pub max_items: Option<usize>,
    pub cmisselector: Option<String>,
}

async fn cmis_root(State(db): State<Db>, Query(params): Query<CmisParams>) -> Response {
    browse(&db, "", params).await
}

async fn cmis_path(State(db): State<Db>, Path(path): Path<String>, Query(params): Query<CmisParams>) -> Response {
    browse(&db, &path, params).await
}

async fn browse(db: &Db, path: &str, params: CmisParams) -> Response {
    let repo = db.read().await;
    debug!(path, ?params, "cmis browse");
    let Some(node) = repo.resolve(path) else {
        return cmis_error(StatusCode::NOT_FOUND, "objectNotFound", format!("no object at /{path}"));
    };
    match params.cmisselector.as_deref() {
        Some("object") => Json(repo.cmis_object(node)).into_response(),
        None | Some("children") if node.is_folder => {
            let children = repo.children(&node.id);
            let max_items = params.max_items.unwrap_or(DEFAULT_MAX_ITEMS);
            let objects: Vec<_> = children
                .iter()
                .take(max_items)
                .map(|child| json!({ "object": repo.cmis_object(child) }))
                .collect();
            Json(json!({
                "objects": objects,
                "hasMoreItems": children.len() > max_items,
                "numItems": children.len(),
            }))
            .into_response()
        }
        None | Some("children") => cmis_error(StatusCode::BAD_REQUEST, "invalidArgument", "not a folder"),
        Some(other) => cmis_error(StatusCode::BAD_REQUEST, "invalidArgument", format!("unknown selector {other}")),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub include: Option<String>,
    pub max_items: Option<usize>,
    pub skip_count: Option<usize>,
}

async fn deleted_nodes(State(db): State<Db>, Query(params): Query<PageParams>) -> Json<Value> {
    let repo = db.read().await;
    let with_properties = params
        .include
        .as_deref()
        .is_some_and(|include| include.split(',').any(|field| field == "properties"));
    let skip = params.skip_count.unwrap_or(0);
    let max_items = params.max_items.unwrap_or(DEFAULT_MAX_ITEMS);
    let total = repo.trashcan.len();
    let entries: Vec<_> = repo
        .trashcan
        .iter()
        .skip(skip)
        .take(max_items)
        .map(|node| {
            let mut entry = repo.rest_entry(node, with_properties);
            entry["archivedAt"] = json!(TIMESTAMP);
            json!({ "entry": entry })
        })
        .collect();
    Json(json!({
        "list": {
            "pagination": {
                "count": entries.len(),
                "hasMoreItems": skip + entries.len() < total,
                "totalItems": total,
                "skipCount": skip,
                "maxItems": max_items,
            },
            "entries": entries,
        }
    }))
}

async fn get_node(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let repo = db.read().await;
    match repo.get(&id) {
        Some(node) => Json(json!({ "entry": repo.rest_entry(node, true) })).into_response(),
        None => rest_error(StatusCode::NOT_FOUND, format!("node {id} was not found")),
    }
}

async fn delete_node(State(db): State<Db>, Path(id): Path<String>) -> Response {
    match db.write().await.delete(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(status) => rest_error(status, format!("cannot delete node {id}")),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyBody {
    pub target_parent_id: String,
    pub name: Option<String>,
}

async fn copy_node(State(db): State<Db>, Path(id): Path<String>, Json(body): Json<CopyBody>) -> Response {
    let mut repo = db.write().await;
    match repo.copy(&id, &body.target_parent_id, body.name.as_deref()) {
        Ok(copy_id) => match repo.get(&copy_id) {
            Some(node) => (StatusCode::CREATED, Json(json!({ "entry": repo.rest_entry(node, true) }))).into_response(),
            None => rest_error(StatusCode::INTERNAL_SERVER_ERROR, "copy vanished"),
        },
        Err(status) => rest_error(status, format!("cannot copy node {id}")),
    }
}

#[derive(Debug, Deserialize)]
pub struct MkdirBody {
    pub destination: String,
    pub paths: Vec<String>,
}

async fn mkdir(State(db): State<Db>, Json(body): Json<MkdirBody>) -> Response {
    let Some(parent_id) = body.destination.strip_prefix(WORKSPACE_STORE) else {
        return rest_error(StatusCode::BAD_REQUEST, format!("bad destination {}", body.destination));
    };
    let mut repo = db.write().await;
    if !repo.get(parent_id).is_some_and(|n| n.is_folder) {
        return rest_error(StatusCode::NOT_FOUND, format!("no folder {parent_id}"));
    }
    for path in &body.paths {
        let mut current = parent_id.to_string();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = repo.ensure_folder(&current, segment);
        }
    }
    Json(json!({})).into_response()
}
