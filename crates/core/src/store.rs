//! Document store: loads a root specification document and its transitive
//! reference graph into an addressable collection.
//!
//! The traversal is breadth-first over `$ref` edges. A location already
//! visited is never re-fetched, which is what makes circular reference
//! chains terminate: cycle edges are left in place as resolvable references
//! instead of being expanded. After loading, lookup by location is O(1).

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::LoadError;
use crate::refs::Ref;

/// The origin of a document node: a local file or a remote URL.
///
/// Local paths are absolutized and normalized on construction so that the
/// same document reached through different reference chains maps to a single
/// store entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    /// A local filesystem path, absolute and normalized.
    Path(PathBuf),
    /// A remote document.
    Url(Url),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(p) => write!(f, "{}", p.display()),
            Location::Url(u) => write!(f, "{u}"),
        }
    }
}

impl Location {
    /// Interpret a caller-supplied spec string as a location. Relative paths
    /// are resolved against `base`.
    pub fn parse(spec: &str, base: &Path) -> Result<Self, String> {
        if spec.starts_with("http://") || spec.starts_with("https://") {
            let url = Url::parse(spec).map_err(|err| format!("invalid URL: {err}"))?;
            return Ok(Location::Url(url));
        }
        let path = Path::new(spec);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        };
        Ok(Location::Path(normalize_path(&absolute)))
    }

    /// Resolve a reference target relative to this document's location.
    pub fn join(&self, target: &str) -> Result<Self, String> {
        if target.starts_with("http://") || target.starts_with("https://") {
            let url = Url::parse(target).map_err(|err| format!("invalid URL: {err}"))?;
            return Ok(Location::Url(url));
        }
        match self {
            Location::Url(url) => {
                let joined = url
                    .join(target)
                    .map_err(|err| format!("invalid URL reference: {err}"))?;
                Ok(Location::Url(joined))
            }
            Location::Path(path) => {
                let parent = path.parent().unwrap_or(Path::new(""));
                Ok(Location::Path(normalize_path(&parent.join(target))))
            }
        }
    }

    /// Store key for this location, relative to `base` where possible.
    pub fn relative_key(&self, base: &Path) -> String {
        match self {
            Location::Path(p) => p
                .strip_prefix(base)
                .map(|rel| rel.display().to_string())
                .unwrap_or_else(|_| p.display().to_string()),
            Location::Url(u) => u.to_string(),
        }
    }
}

/// Normalize `.` and `..` components without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// An addressable collection of every document transitively reachable from
/// the root specification.
#[derive(Debug)]
pub struct DocumentStore {
    base: PathBuf,
    root: Location,
    documents: HashMap<Location, Value>,
}

impl DocumentStore {
    /// Load the root document and the transitive closure of its `$ref` graph.
    ///
    /// The first fetch or parse failure aborts the load naming the failing
    /// location; no partial store is returned.
    pub async fn load(spec: &str, base: &Path) -> Result<Self, LoadError> {
        let root = Location::parse(spec, base).map_err(|reason| LoadError::Fetch {
            location: Location::Path(PathBuf::from(spec)),
            reason,
        })?;

        let mut documents = HashMap::new();
        let mut queue = VecDeque::from([root.clone()]);
        let mut seen = HashSet::from([root.clone()]);

        while let Some(location) = queue.pop_front() {
            let contents = fetch(&location).await?;
            let value: Value =
                serde_yaml::from_str(&contents).map_err(|err| LoadError::Parse {
                    location: location.clone(),
                    reason: err.to_string(),
                })?;

            for target in collect_ref_targets(&value) {
                let next = location
                    .join(&target)
                    .map_err(|reason| LoadError::InvalidTarget {
                        target: target.clone(),
                        origin: location.clone(),
                        reason,
                    })?;
                if seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }

            debug!(location = %location, "Loaded document.");
            documents.insert(location, value);
        }

        Ok(Self {
            base: base.to_path_buf(),
            root,
            documents,
        })
    }

    /// The root document's location.
    pub fn root(&self) -> &Location {
        &self.root
    }

    /// The root document's store key.
    pub fn root_key(&self) -> String {
        self.root.relative_key(&self.base)
    }

    /// Look up a whole document by location.
    pub fn get(&self, location: &Location) -> Option<&Value> {
        self.documents.get(location)
    }

    /// Base-relative key of a loaded document, if the location is in the
    /// store.
    pub fn key_of(&self, location: &Location) -> Option<String> {
        self.documents
            .contains_key(location)
            .then(|| location.relative_key(&self.base))
    }

    /// Location of the document stored under `key`, if any.
    pub fn locate(&self, key: &str) -> Option<&Location> {
        self.documents
            .keys()
            .find(|location| location.relative_key(&self.base) == key)
    }

    /// Navigate to the node a reference points at, if present.
    pub fn node_at(&self, reference: &Ref) -> Option<&Value> {
        let document = self.documents.get(&reference.location)?;
        document.pointer(&reference.pointer)
    }

    /// Every loaded document, keyed by its base-relative key, in a stable
    /// order.
    pub fn entries(&self) -> BTreeMap<String, &Value> {
        self.documents
            .iter()
            .map(|(location, value)| (location.relative_key(&self.base), value))
            .collect()
    }
}

/// Fetch raw document text from a local file or a remote URL.
async fn fetch(location: &Location) -> Result<String, LoadError> {
    match location {
        Location::Path(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|err| LoadError::Fetch {
                    location: location.clone(),
                    reason: err.to_string(),
                })
        }
        Location::Url(url) => {
            let response = reqwest::get(url.as_str())
                .await
                .and_then(|resp| resp.error_for_status())
                .map_err(|err| LoadError::Fetch {
                    location: location.clone(),
                    reason: err.to_string(),
                })?;
            response.text().await.map_err(|err| LoadError::Fetch {
                location: location.clone(),
                reason: err.to_string(),
            })
        }
    }
}

/// Collect the document part of every `$ref` string in a raw value.
///
/// Same-document references (`#/...`) carry no document part and contribute
/// no new fetch targets.
fn collect_ref_targets(value: &Value) -> Vec<String> {
    let mut targets = Vec::new();
    collect_into(value, &mut targets);
    targets
}

fn collect_into(value: &Value, targets: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(raw)) = map.get("$ref") {
                let document = raw.split_once('#').map_or(raw.as_str(), |(doc, _)| doc);
                if !document.is_empty() {
                    targets.push(document.to_string());
                }
            }
            for child in map.values() {
                collect_into(child, targets);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_into(item, targets);
            }
        }
        _ => {}
    }
}
