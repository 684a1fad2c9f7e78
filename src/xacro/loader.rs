use crate::error::TemplateError;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

struct CachedTemplate {
    content: Arc<str>,
    modified: SystemTime,
}

/// Content cache for template sources, keyed on modification time.
///
/// Include trees re-read shared fragments (inertials, materials, common
/// macros); a stale entry is replaced as soon as the file changes on disk.
static TEMPLATE_CACHE: Lazy<DashMap<PathBuf, CachedTemplate>> = Lazy::new(DashMap::new);

pub(crate) fn read_template(path: &Path) -> Result<Arc<str>, TemplateError> {
    let io_err = |source| TemplateError::Io {
        file: path.display().to_string(),
        source,
    };

    let modified = std::fs::metadata(path).and_then(|m| m.modified()).map_err(io_err)?;

    if let Some(entry) = TEMPLATE_CACHE.get(path) {
        if entry.modified == modified {
            log::trace!("Template cache hit: {}", path.display());
            return Ok(Arc::clone(&entry.content));
        }
    }

    log::debug!("Template cache miss: {}", path.display());
    let content: Arc<str> = std::fs::read_to_string(path).map_err(io_err)?.into();
    TEMPLATE_CACHE.insert(
        path.to_path_buf(),
        CachedTemplate {
            content: Arc::clone(&content),
            modified,
        },
    );

    Ok(content)
}
