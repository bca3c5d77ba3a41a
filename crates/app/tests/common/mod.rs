//! A mock WebHDFS namenode for exercising the real HTTP client
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::json;
use url::Url;

use ::common::prelude::*;
use dfs_provision::webhdfs::{WebHdfsAuth, WebHdfsConnector};

pub const SERVICE_USER: &str = "hdfs";
pub const SERVICE_GROUP: &str = "hadoop";

const API_PREFIX: &str = "/webhdfs/v1";
const AUTH_PARAMS: [&str; 2] = ["user.name", "delegation"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockNode {
    pub directory: bool,
    pub owner: Option<String>,
    pub group: Option<String>,
    pub permission: Option<String>,
    pub content: Vec<u8>,
}

impl MockNode {
    fn directory() -> Self {
        Self {
            directory: true,
            owner: None,
            group: None,
            permission: None,
            content: Vec::new(),
        }
    }

    fn file(content: Vec<u8>) -> Self {
        Self {
            directory: false,
            content,
            ..Self::directory()
        }
    }
}

/// One request as the namenode saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: Method,
    pub op: String,
    pub path: String,
    pub params: HashMap<String, String>,
}

impl Recorded {
    pub fn is_mutation(&self) -> bool {
        self.op != "GETFILESTATUS"
    }
}

#[derive(Debug, Default)]
struct Inner {
    nodes: BTreeMap<String, MockNode>,
    requests: Vec<Recorded>,
    denied: Vec<String>,
}

/// Serves the subset of the WebHDFS REST API the provisioning job uses,
/// including the CREATE redirect to a "datanode" on the same listener.
#[derive(Clone)]
pub struct MockNamenode {
    addr: SocketAddr,
    inner: Arc<Mutex<Inner>>,
}

impl MockNamenode {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let namenode = Self {
            addr,
            inner: Arc::new(Mutex::new(Inner::default())),
        };

        let router = Router::new()
            .fallback(handle)
            .with_state(namenode.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        namenode
    }

    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn connector(&self) -> WebHdfsConnector {
        self.connector_with(WebHdfsAuth::User(SERVICE_USER.to_string()))
    }

    pub fn connector_with(&self, auth: WebHdfsAuth) -> WebHdfsConnector {
        WebHdfsConnector::new(self.url(), auth).unwrap()
    }

    /// Every mutation of `path` is answered with AccessControlException
    pub fn deny(&self, path: &str) {
        self.inner.lock().denied.push(path.to_string());
    }

    pub fn seed_file(&self, path: &str, content: &[u8]) {
        let mut inner = self.inner.lock();
        ensure_parents(&mut inner.nodes, path);
        inner
            .nodes
            .insert(path.to_string(), MockNode::file(content.to_vec()));
    }

    pub fn node(&self, path: &str) -> Option<MockNode> {
        self.inner.lock().nodes.get(path).cloned()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().requests.clone()
    }

    pub fn mutations(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(Recorded::is_mutation)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.inner.lock().requests.clear();
    }
}

pub fn reconciler() -> Reconciler {
    Reconciler::new(SERVICE_USER, SERVICE_GROUP)
}

fn ensure_parents(nodes: &mut BTreeMap<String, MockNode>, path: &str) {
    let mut current = String::new();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    for segment in segments.iter().take(segments.len().saturating_sub(1)) {
        current.push('/');
        current.push_str(segment);
        nodes
            .entry(current.clone())
            .or_insert_with(MockNode::directory);
    }
}

fn remote_exception(status: StatusCode, exception: &str, message: String) -> Response {
    let body = json!({
        "RemoteException": {
            "exception": exception,
            "javaClassName": format!("org.apache.hadoop.{}", exception),
            "message": message,
        }
    });
    (status, Json(body)).into_response()
}

/// Where a CREATE is sent next. The caller's credentials ride along, as a
/// real namenode embeds `user.name` or `delegation` in the redirect.
fn datanode_location(
    addr: SocketAddr,
    path: &str,
    overwrite: bool,
    params: &HashMap<String, String>,
) -> Url {
    let mut location = Url::parse(&format!("http://{}{}{}", addr, API_PREFIX, path)).unwrap();
    {
        let mut query = location.query_pairs_mut();
        query
            .append_pair("op", "CREATE")
            .append_pair("datanode", "true")
            .append_pair("overwrite", if overwrite { "true" } else { "false" });
        for key in AUTH_PARAMS {
            if let Some(value) = params.get(key) {
                query.append_pair(key, value);
            }
        }
    }
    location
}

async fn handle(
    State(namenode): State<MockNamenode>,
    method: Method,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let Some(raw) = uri.path().strip_prefix(API_PREFIX) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let path = match raw.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    };
    let op = params.get("op").cloned().unwrap_or_default();

    let mut inner = namenode.inner.lock();
    inner.requests.push(Recorded {
        method: method.clone(),
        op: op.clone(),
        path: path.clone(),
        params: params.clone(),
    });

    if op != "GETFILESTATUS" && inner.denied.contains(&path) {
        return remote_exception(
            StatusCode::FORBIDDEN,
            "AccessControlException",
            format!("Permission denied: {}", path),
        );
    }

    match (method, op.as_str()) {
        (Method::GET, "GETFILESTATUS") => {
            if path == "/" {
                return Json(json!({ "FileStatus": { "type": "DIRECTORY" } })).into_response();
            }
            match inner.nodes.get(&path) {
                Some(node) => {
                    let kind = if node.directory { "DIRECTORY" } else { "FILE" };
                    Json(json!({
                        "FileStatus": {
                            "type": kind,
                            "owner": node.owner,
                            "group": node.group,
                            "permission": node.permission,
                            "length": node.content.len(),
                        }
                    }))
                    .into_response()
                }
                None => remote_exception(
                    StatusCode::NOT_FOUND,
                    "FileNotFoundException",
                    format!("File does not exist: {}", path),
                ),
            }
        }
        (Method::PUT, "MKDIRS") => {
            ensure_parents(&mut inner.nodes, &path);
            inner
                .nodes
                .entry(path)
                .or_insert_with(MockNode::directory);
            Json(json!({ "boolean": true })).into_response()
        }
        (Method::PUT, "CREATE") => {
            let overwrite = params.get("overwrite").map(String::as_str) == Some("true");
            if inner.nodes.contains_key(&path) && !overwrite {
                return remote_exception(
                    StatusCode::FORBIDDEN,
                    "FileAlreadyExistsException",
                    format!("{} already exists", path),
                );
            }
            if params.get("datanode").map(String::as_str) != Some("true") {
                let location = datanode_location(namenode.addr, &path, overwrite, &params);
                return (
                    StatusCode::TEMPORARY_REDIRECT,
                    [(header::LOCATION, location.to_string())],
                )
                    .into_response();
            }
            ensure_parents(&mut inner.nodes, &path);
            inner.nodes.insert(path, MockNode::file(body.to_vec()));
            StatusCode::CREATED.into_response()
        }
        (Method::PUT, "SETOWNER") => match inner.nodes.get_mut(&path) {
            Some(node) => {
                node.owner = params.get("owner").cloned();
                node.group = params.get("group").cloned();
                StatusCode::OK.into_response()
            }
            None => remote_exception(
                StatusCode::NOT_FOUND,
                "FileNotFoundException",
                format!("File does not exist: {}", path),
            ),
        },
        (Method::PUT, "SETPERMISSION") => match inner.nodes.get_mut(&path) {
            Some(node) => {
                node.permission = params.get("permission").cloned();
                StatusCode::OK.into_response()
            }
            None => remote_exception(
                StatusCode::NOT_FOUND,
                "FileNotFoundException",
                format!("File does not exist: {}", path),
            ),
        },
        _ => remote_exception(
            StatusCode::BAD_REQUEST,
            "IllegalArgumentException",
            format!("Invalid value for webhdfs parameter \"op\": {}", op),
        ),
    }
}
