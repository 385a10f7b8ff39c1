use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the navigation stack.
///
/// Locations are logically immutable once committed; mutation only happens
/// while an operation is building a proposed next state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Pathname plus query, without the basename.
    pub url: String,
    /// The path portion of [`Location::url`].
    pub pathname: String,
    /// The query portion of [`Location::url`], including the leading `?`.
    /// Empty when there is no query.
    pub search: String,
    /// Identifies this stack slot. Generated fresh on every push/replace.
    pub key: String,
    /// Arbitrary state payload attached to the entry.
    #[serde(default)]
    pub state: Value,
    /// The basename the entry was created under.
    #[serde(default)]
    pub basename: String,
}

impl Location {
    /// Create a location from a path (optionally carrying a query), a state
    /// payload and the basename it originates from.
    pub fn new(path: &str, state: Value, key: String, basename: &str) -> Self {
        let (pathname, search) = split_path(path);
        Self {
            url: format!("{pathname}{search}"),
            pathname,
            search,
            key,
            state,
            basename: basename.to_string(),
        }
    }

    /// Create a location from a bare path with a fresh key and no state.
    pub fn from_path(path: impl AsRef<str>) -> Self {
        Self::new(path.as_ref(), Value::Null, create_key(), "")
    }

    /// The full address of this entry: basename plus url.
    pub fn href(&self) -> String {
        format!("{}{}", self.basename, self.url)
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Self::from_path(path)
    }
}

/// Generate a fresh entry key.
pub fn create_key() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

/// Normalize a basename: exactly one leading slash, no trailing slash.
pub fn format_slashes(basename: &str) -> String {
    let trimmed = basename.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Find the basename a path starts with, if any.
pub fn find_basename<'a>(path: &str, basenames: &'a [String]) -> Option<&'a str> {
    basenames
        .iter()
        .find(|bn| !bn.is_empty() && path.starts_with(bn.as_str()))
        .map(String::as_str)
}

fn split_path(path: &str) -> (String, String) {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    match path.split_once('?') {
        Some((pathname, search)) => (pathname.to_string(), format!("?{search}")),
        None => (path, String::new()),
    }
}

/// Merge a state patch into an entry's existing state.
///
/// Two JSON objects merge shallowly; anything else replaces the previous
/// value. A `Null` patch leaves the state untouched.
pub(crate) fn merge_state(target: &mut Value, patch: &Value) {
    if patch.is_null() {
        return;
    }
    match (target.as_object_mut(), patch.as_object()) {
        (Some(base), Some(update)) => {
            for (k, v) in update {
                base.insert(k.clone(), v.clone());
            }
        }
        _ => *target = patch.clone(),
    }
}
