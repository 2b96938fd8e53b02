//! Files served from the public directory for paths no route matches.

use std::io;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

#[derive(Debug, Clone)]
pub struct StaticFiles {
    base_dir: PathBuf,
}

impl StaticFiles {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base_dir: base.into() }
    }

    /// Map a URL path below the base directory; `None` on traversal attempts.
    ///
    /// Segments are percent-decoded one at a time, so an encoded `/` can never
    /// introduce a new path component.
    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone();
        for segment in url_path.split('/') {
            let decoded = percent_decode_str(segment).decode_utf8().ok()?;
            if decoded.contains(['/', '\\', '\0']) {
                return None;
            }
            match Path::new(&*decoded).components().next() {
                None | Some(Component::CurDir) => {}
                Some(Component::Normal(s)) => pb.push(s),
                Some(_) => return None,
            }
        }
        Some(pb)
    }

    fn content_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase()
            .as_str()
        {
            "html" | "htm" => "text/html; charset=utf-8",
            "css" => "text/css",
            "js" => "application/javascript",
            "json" => "application/json",
            "txt" => "text/plain; charset=utf-8",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "svg" => "image/svg+xml",
            "ico" => "image/x-icon",
            _ => "application/octet-stream",
        }
    }

    pub fn has(&self, url_path: &str) -> bool {
        self.map_path(url_path).is_some_and(|p| p.is_file())
    }

    pub async fn load(&self, url_path: &str) -> io::Result<(Vec<u8>, &'static str)> {
        let path = self
            .map_path(url_path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid path"))?;
        if !path.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        }
        let bytes = tokio::fs::read(&path).await?;
        Ok((bytes, Self::content_type(&path)))
    }
}
