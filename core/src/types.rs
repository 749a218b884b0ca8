//! DTOs for the CMIS browser binding and the public REST API.
//!
//! # Design
//! The two API families report nodes in different shapes and are kept as
//! separate types. Fields the client never reads are still preserved, either
//! as raw JSON (`serde_json::Value`) or in a flattened `extra` map. Optional
//! members are `Option<Option<T>>` (absent, `null`, value), so a decoded
//! `Node` or `CmisProperty` re-serializes to the members the server sent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Store reference prefix of nodes in the default workspace.
pub const WORKSPACE_STORE: &str = "workspace://SpacesStore/";

/// Well-known CMIS property ids.
pub mod props {
    pub const OBJECT_ID: &str = "cmis:objectId";
    pub const PARENT_ID: &str = "cmis:parentId";
    pub const NAME: &str = "cmis:name";
    pub const PATH: &str = "cmis:path";
    pub const BASE_TYPE_ID: &str = "cmis:baseTypeId";
    pub const OBJECT_TYPE_ID: &str = "cmis:objectTypeId";
}

// ---------------------------------------------------------------------------
// CMIS browser binding
// ---------------------------------------------------------------------------

/// A single CMIS property as reported by the browser binding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CmisProperty {
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub id: Option<Option<String>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub local_name: Option<Option<String>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<Option<String>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub query_name: Option<Option<String>>,
    #[serde(rename = "type", default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<Option<String>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::nullable::present", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A CMIS object: a property map keyed by property id plus whatever else the
/// server attached (`allowableActions`, `succinctProperties`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CmisObject {
    #[serde(default)]
    pub properties: BTreeMap<String, CmisProperty>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CmisObject {
    /// Value of a property, `None` when absent or JSON `null`.
    pub fn property_value(&self, id: &str) -> Option<&Value> {
        self.properties
            .get(id)
            .and_then(|prop| prop.value.as_ref())
            .filter(|value| !value.is_null())
    }

    /// Value of a single-valued string property.
    pub fn property_str(&self, id: &str) -> Option<&str> {
        self.property_value(id).and_then(Value::as_str)
    }

    pub fn object_id(&self) -> Option<&str> {
        self.property_str(props::OBJECT_ID)
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.property_str(props::PARENT_ID)
    }

    pub fn name(&self) -> Option<&str> {
        self.property_str(props::NAME)
    }

    /// Repository path; only folders report one.
    pub fn path(&self) -> Option<&str> {
        self.property_str(props::PATH)
    }

    pub fn base_type_id(&self) -> Option<&str> {
        self.property_str(props::BASE_TYPE_ID)
    }
}

/// Response of `cmisselector=object`.
pub type SingleObject = CmisObject;

/// One item of a CMIS children listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CmisObjectEntry {
    pub object: CmisObject,
}

/// CMIS children listing envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CmisObjects {
    #[serde(default)]
    pub objects: Vec<CmisObjectEntry>,
    #[serde(default)]
    pub has_more_items: bool,
    #[serde(default)]
    pub num_items: u64,
}

impl CmisObjects {
    pub fn iter(&self) -> impl Iterator<Item = &CmisObject> {
        self.objects.iter().map(|entry| &entry.object)
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Public REST API v1
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentInfo {
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<Option<String>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub mime_type_name: Option<Option<String>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub size_in_bytes: Option<Option<u64>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Option<String>>,
}

/// A node entry of the REST API.
///
/// Timestamps are kept as the server formatted them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<Option<String>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub is_folder: Option<Option<bool>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub is_file: Option<Option<bool>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<String>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Option<String>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<Option<String>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub created_by_user: Option<Option<UserInfo>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub modified_by_user: Option<Option<UserInfo>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub aspect_names: Option<Option<Vec<String>>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub properties: Option<Option<Map<String, Value>>>,
    #[serde(default, with = "crate::nullable", skip_serializing_if = "Option::is_none")]
    pub content: Option<Option<ContentInfo>>,
    #[serde(default, deserialize_with = "crate::nullable::present", skip_serializing_if = "Option::is_none")]
    pub path: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn node_type(&self) -> Option<&str> {
        self.node_type.as_ref().and_then(Option::as_deref)
    }

    pub fn is_folder(&self) -> bool {
        self.is_folder.flatten().unwrap_or(false)
    }

    pub fn is_file(&self) -> bool {
        self.is_file.flatten().unwrap_or(false)
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_ref().and_then(Option::as_deref)
    }

    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.properties.as_ref().and_then(Option::as_ref)
    }

    pub fn content(&self) -> Option<&ContentInfo> {
        self.content.as_ref().and_then(Option::as_ref)
    }
}

/// `{"entry": Node}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRes {
    pub entry: Node,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub count: u64,
    pub has_more_items: bool,
    pub total_items: u64,
    pub skip_count: u64,
    pub max_items: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeList {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub entries: Vec<NodeRes>,
}

/// Paginated node listing envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodesRes {
    pub list: NodeList,
}

impl NodesRes {
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.list.entries.iter().map(|res| &res.entry)
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of a node copy request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Copy {
    pub target_parent_id: String,
    /// Name for the copy; the source name is kept when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Copy {
    pub fn new(target_parent_id: impl Into<String>) -> Self {
        Self { target_parent_id: target_parent_id.into(), name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Body of the legacy folder-creation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateFolders {
    pub destination: String,
    pub paths: Vec<String>,
}

impl CreateFolders {
    /// Folders to create below the workspace node `node_id`.
    pub fn under(node_id: &str, paths: &[String]) -> Self {
        Self {
            destination: format!("{WORKSPACE_STORE}{node_id}"),
            paths: paths.to_vec(),
        }
    }
}
