//! Static file serving middleware.

use crate::handler::{BoxError, Flow, Handler};
use crate::request::Request;
use strada_http::protocol::Response;

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// How aggressively clients may cache served files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeployMode {
    /// No caching, for local iteration.
    Test,
    /// One hour.
    #[default]
    Production,
}

impl DeployMode {
    fn cache_control(self) -> &'static str {
        match self {
            DeployMode::Test => "max-age=0",
            DeployMode::Production => "max-age=3600",
        }
    }
}

/// Serves files from a directory, passing control on when the path does not
/// resolve to a file under it.
///
/// Register it like any other layer, typically early in the chain with the
/// root mount. `/` is rewritten to `/index.html`.
#[derive(Debug)]
pub struct ServeDir {
    base_dir: PathBuf,
    mode: DeployMode,
}

impl ServeDir {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), mode: DeployMode::default() }
    }

    pub fn with_mode(mut self, mode: DeployMode) -> Self {
        self.mode = mode;
        self
    }

    /// Resolves a request path to a file path under the base directory.
    ///
    /// Only plain path segments are accepted; anything that could climb out
    /// of the base directory (`..`, absolute paths, drive prefixes) resolves
    /// to nothing.
    fn map_path(&self, request_path: &str) -> Option<PathBuf> {
        let request_path = if request_path == "/" { "/index.html" } else { request_path };

        let mut resolved = self.base_dir.clone();
        for component in Path::new(request_path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(segment) => resolved.push(segment),
                _ => return None,
            }
        }
        Some(resolved)
    }
}

#[async_trait]
impl Handler for ServeDir {
    async fn handle(
        &self,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<Flow, BoxError> {
        let Some(file_path) = self.map_path(request.path()) else {
            return Ok(Flow::Next);
        };

        let contents = match tokio::fs::read(&file_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %file_path.display(), "no such static file");
                return Ok(Flow::Next);
            }
            Err(e) => return Err(e.into()),
        };

        let extension = file_path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        response.set("Cache-Control", self.mode.cache_control());
        response.send_file(extension, &contents).await?;
        Ok(Flow::Done)
    }
}
