use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use common::prelude::{
    Connect, FileSystem, FilesystemError, FsOp, Ownership, Permission, ResourcePath,
};

use super::error::WebHdfsError;
use crate::config::{HdfsAuth, HdfsConfig};

/// REST prefix every WebHDFS path lives under
const API_PREFIX: [&str; 2] = ["webhdfs", "v1"];

/// Credentials attached to every request as a query parameter.
#[derive(Clone, PartialEq, Eq)]
pub enum WebHdfsAuth {
    /// `user.name=<user>` pseudo authentication
    User(String),
    /// `delegation=<token>`
    Delegation(String),
}

impl WebHdfsAuth {
    fn query_pair(&self) -> (&'static str, &str) {
        match self {
            WebHdfsAuth::User(user) => ("user.name", user.as_str()),
            WebHdfsAuth::Delegation(token) => ("delegation", token.as_str()),
        }
    }
}

impl std::fmt::Debug for WebHdfsAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebHdfsAuth::User(user) => f.debug_tuple("User").field(user).finish(),
            WebHdfsAuth::Delegation(_) => f.write_str("Delegation(<redacted>)"),
        }
    }
}

#[derive(Deserialize)]
struct BooleanResponse {
    boolean: bool,
}

/// Opens [`WebHdfs`] handles against one namenode.
#[derive(Debug, Clone)]
pub struct WebHdfsConnector {
    namenode: Url,
    auth: WebHdfsAuth,
    timeout: Duration,
}

impl WebHdfsConnector {
    pub fn new(namenode: Url, auth: WebHdfsAuth) -> Result<Self, WebHdfsError> {
        if namenode.cannot_be_a_base() {
            return Err(WebHdfsError::InvalidNamenode(namenode.to_string()));
        }
        Ok(Self {
            namenode,
            auth,
            timeout: Duration::from_secs(60),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config(config: &HdfsConfig) -> Result<Self, WebHdfsError> {
        let auth = match &config.auth {
            HdfsAuth::Simple => WebHdfsAuth::User(config.principal_short_name().to_string()),
            HdfsAuth::SimpleAs { user } => WebHdfsAuth::User(user.clone()),
            HdfsAuth::Delegation { token } => WebHdfsAuth::Delegation(token.clone()),
        };
        Ok(Self::new(config.namenode.clone(), auth)?
            .with_timeout(Duration::from_secs(config.timeout_secs)))
    }

    pub fn namenode(&self) -> &Url {
        &self.namenode
    }
}

#[async_trait::async_trait]
impl Connect for WebHdfsConnector {
    type Handle = WebHdfs;

    async fn connect(&self) -> Result<WebHdfs, FilesystemError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(self.timeout)
            .build()
            .map_err(FilesystemError::connect)?;

        let fs = WebHdfs {
            namenode: self.namenode.clone(),
            auth: self.auth.clone(),
            client,
        };
        fs.probe().await.map_err(FilesystemError::connect)?;

        tracing::info!(namenode = %self.namenode, "connected to filesystem");
        Ok(fs)
    }
}

/// An open WebHDFS session.
#[derive(Debug)]
pub struct WebHdfs {
    namenode: Url,
    auth: WebHdfsAuth,
    client: Client,
}

impl WebHdfs {
    /// `{namenode}/webhdfs/v1{path}?op={op}&{params}&{auth}`
    fn endpoint(&self, path: &str, op: &str, params: &[(&str, &str)]) -> Result<Url, WebHdfsError> {
        let mut url = self.namenode.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| WebHdfsError::InvalidNamenode(self.namenode.to_string()))?;
            segments.pop_if_empty().extend(API_PREFIX);
            let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            if parts.is_empty() {
                segments.push("");
            } else {
                segments.extend(parts);
            }
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("op", op);
            for (key, value) in params {
                query.append_pair(key, value);
            }
            let (key, value) = self.auth.query_pair();
            query.append_pair(key, value);
        }
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response, WebHdfsError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(WebHdfsError::from_response(response).await)
        }
    }

    async fn put(&self, path: &str, op: &str, params: &[(&str, &str)]) -> Result<Response, WebHdfsError> {
        let url = self.endpoint(path, op, params)?;
        tracing::debug!(op, path, "webhdfs request");
        let response = self.client.put(url).send().await?;
        Self::check(response).await
    }

    /// Cheap authenticated request proving the namenode is reachable
    async fn probe(&self) -> Result<(), WebHdfsError> {
        let url = self.endpoint("/", "GETFILESTATUS", &[])?;
        let response = self.client.get(url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn file_status(&self, path: &str) -> Result<bool, WebHdfsError> {
        let url = self.endpoint(path, "GETFILESTATUS", &[])?;
        tracing::debug!(op = "GETFILESTATUS", path, "webhdfs request");
        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(WebHdfsError::from_response(response).await),
        }
    }

    async fn make_dirs(&self, path: &str) -> Result<(), WebHdfsError> {
        let response = self.put(path, "MKDIRS", &[]).await?;
        let result: BooleanResponse = response.json().await?;
        if result.boolean {
            Ok(())
        } else {
            Err(WebHdfsError::Refused("MKDIRS"))
        }
    }

    /// Two-step create: the namenode redirects to a datanode, which takes
    /// the content.
    async fn create_file(&self, path: &str, content: Bytes) -> Result<(), WebHdfsError> {
        let url = self.endpoint(path, "CREATE", &[("overwrite", "false")])?;
        tracing::debug!(op = "CREATE", path, "webhdfs request");
        let response = self.client.put(url).send().await?;
        if !response.status().is_redirection() {
            return Err(WebHdfsError::from_response(response).await);
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(WebHdfsError::MissingLocation)?;
        let target = self.namenode.join(location)?;

        let response = self
            .client
            .put(target)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"))
            .body(content)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl FileSystem for WebHdfs {
    async fn exists(&self, path: &ResourcePath) -> Result<bool, FilesystemError> {
        self.file_status(path.as_str())
            .await
            .map_err(|e| FilesystemError::operation(FsOp::Exists, path, e))
    }

    async fn mkdirs(&self, path: &ResourcePath) -> Result<(), FilesystemError> {
        self.make_dirs(path.as_str())
            .await
            .map_err(|e| FilesystemError::operation(FsOp::Mkdirs, path, e))
    }

    async fn create(&self, path: &ResourcePath, content: Bytes) -> Result<(), FilesystemError> {
        self.create_file(path.as_str(), content)
            .await
            .map_err(|e| FilesystemError::operation(FsOp::Create, path, e))
    }

    async fn set_owner(
        &self,
        path: &ResourcePath,
        ownership: &Ownership,
    ) -> Result<(), FilesystemError> {
        let params = [
            ("owner", ownership.user.as_str()),
            ("group", ownership.group.as_str()),
        ];
        self.put(path.as_str(), "SETOWNER", &params)
            .await
            .map(|_| ())
            .map_err(|e| FilesystemError::operation(FsOp::SetOwner, path, e))
    }

    async fn set_permission(
        &self,
        path: &ResourcePath,
        permission: Permission,
    ) -> Result<(), FilesystemError> {
        let octal = permission.octal();
        self.put(path.as_str(), "SETPERMISSION", &[("permission", octal.as_str())])
            .await
            .map(|_| ())
            .map_err(|e| FilesystemError::operation(FsOp::SetPermission, path, e))
    }

    async fn close(self) -> Result<(), FilesystemError> {
        tracing::debug!(namenode = %self.namenode, "closing filesystem handle");
        drop(self.client);
        Ok(())
    }
}
