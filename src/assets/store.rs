use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::points::{Dot, PointSet},
    foundation::error::{MorphError, MorphResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Why a named point list could not be served.
pub enum AssetIssueKind {
    /// The file or the named entry does not exist.
    Missing,
    /// The data exists but does not parse into valid point tuples.
    Malformed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A recorded, non-fatal asset degradation.
pub struct AssetIssue {
    /// Scene name, or `"*"` when the whole file is affected.
    pub name: String,
    /// Degradation category.
    pub kind: AssetIssueKind,
    /// Human readable detail.
    pub detail: String,
}

#[derive(Clone, Copy, Debug)]
/// Result of looking up a named point list.
pub enum AssetLookup<'a> {
    /// Parsed point list.
    Found(&'a [Dot]),
    /// Not present in the store.
    Missing,
    /// Present in the source file but unusable.
    Malformed,
}

impl<'a> AssetLookup<'a> {
    /// Points for this lookup; degradations yield an empty slice.
    pub fn points(self) -> &'a [Dot] {
        match self {
            Self::Found(pts) => pts,
            Self::Missing | Self::Malformed => &[],
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Named point-list assets, one array of `[x, y, r, color?]` tuples per scene.
///
/// Loading is lenient: a missing file or a malformed entry is recorded as an
/// [`AssetIssue`] and logged, never returned as an error, so a composition still
/// renders (with padded placeholder content) when an asset is broken.
pub struct PointAssetStore {
    source: Option<PathBuf>,
    sets: BTreeMap<String, PointSet>,
    malformed: BTreeMap<String, String>,
    issues: Vec<AssetIssue>,
}

impl PointAssetStore {
    /// Empty store with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an asset file, recording (not returning) missing/malformed degradations.
    #[tracing::instrument]
    pub fn load(path: &Path) -> Self {
        let mut store = match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json_str(&text),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "point asset file unavailable");
                let mut store = Self::new();
                store.issues.push(AssetIssue {
                    name: "*".to_string(),
                    kind: AssetIssueKind::Missing,
                    detail: format!("read '{}': {e}", path.display()),
                });
                store
            }
        };
        store.source = Some(path.to_path_buf());
        store
    }

    /// Load an asset file and fail on any problem. Used before rewriting a file in place.
    pub fn load_strict(path: &Path) -> MorphResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read point assets from '{}'", path.display()))?;
        let store = Self::from_json_str(&text);
        if let Some(issue) = store.issues.first() {
            return Err(MorphError::asset(format!(
                "'{}': {} ({})",
                path.display(),
                issue.name,
                issue.detail
            )));
        }
        Ok(Self {
            source: Some(path.to_path_buf()),
            ..store
        })
    }

    /// Parse asset JSON leniently.
    pub fn from_json_str(text: &str) -> Self {
        let mut store = Self::new();

        let root: BTreeMap<String, serde_json::Value> = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "point asset file is not a JSON object of arrays");
                store.issues.push(AssetIssue {
                    name: "*".to_string(),
                    kind: AssetIssueKind::Malformed,
                    detail: e.to_string(),
                });
                return store;
            }
        };

        for (name, value) in root {
            match serde_json::from_value::<PointSet>(value) {
                Ok(points) => {
                    store.sets.insert(name, points);
                }
                Err(e) => {
                    tracing::warn!(scene = %name, error = %e, "malformed point asset entry");
                    store.issues.push(AssetIssue {
                        name: name.clone(),
                        kind: AssetIssueKind::Malformed,
                        detail: e.to_string(),
                    });
                    store.malformed.insert(name, e.to_string());
                }
            }
        }

        store
    }

    /// File this store was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Degradations recorded while loading.
    pub fn issues(&self) -> &[AssetIssue] {
        &self.issues
    }

    /// Names of all successfully parsed point lists.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Look up a named point list.
    pub fn lookup(&self, name: &str) -> AssetLookup<'_> {
        if let Some(pts) = self.sets.get(name) {
            AssetLookup::Found(pts)
        } else if self.malformed.contains_key(name) {
            AssetLookup::Malformed
        } else {
            AssetLookup::Missing
        }
    }

    /// Points for `name`, if present and well-formed.
    pub fn get(&self, name: &str) -> Option<&[Dot]> {
        self.sets.get(name).map(Vec::as_slice)
    }

    /// Insert or replace a named point list.
    pub fn insert(&mut self, name: impl Into<String>, points: PointSet) {
        let name = name.into();
        self.malformed.remove(&name);
        self.sets.insert(name, points);
    }

    /// Serialize to the asset JSON format, one tuple per line.
    pub fn to_json_string(&self) -> MorphResult<String> {
        let mut out = String::from("{");
        for (i, (name, points)) in self.sets.iter().enumerate() {
            out.push_str(if i == 0 { "\n  " } else { ",\n  " });
            out.push_str(&serde_json::to_string(name)?);
            out.push_str(": [");
            for (j, dot) in points.iter().enumerate() {
                out.push_str(if j == 0 { "\n    " } else { ",\n    " });
                out.push_str(&serde_json::to_string(dot)?);
            }
            out.push_str(if points.is_empty() { "]" } else { "\n  ]" });
        }
        out.push_str(if self.sets.is_empty() { "}\n" } else { "\n}\n" });
        Ok(out)
    }

    /// Write the store to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> MorphResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create asset directory '{}'", parent.display()))?;
        }
        let text = self.to_json_string()?;
        std::fs::write(path, text)
            .with_context(|| format!("write point assets to '{}'", path.display()))?;
        Ok(())
    }
}

/// Resolve a config-relative asset path against `root`.
///
/// Absolute paths pass through; relative paths are normalized (`\` to `/`, `.`
/// segments dropped) and may not escape `root` via `..`.
pub fn resolve_asset_path(root: &Path, source: &str) -> MorphResult<PathBuf> {
    if source.trim().is_empty() {
        return Err(MorphError::validation("asset path must be non-empty"));
    }
    if Path::new(source).is_absolute() {
        return Ok(PathBuf::from(source));
    }
    Ok(root.join(normalize_rel_path(source)?))
}

/// Normalize a relative path to forward-slash form without `.` segments.
pub fn normalize_rel_path(source: &str) -> MorphResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(MorphError::validation("asset paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(MorphError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(MorphError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
