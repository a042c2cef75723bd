use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{DisruptError, DisruptResult};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// One element of a scene: an image standing in for a rendered widget, plus its class tags.
pub struct SceneElement {
    /// Image path, relative to the scene file.
    pub source: String,
    /// Class tags (`disrupt`, an effect id, `loop`, ...).
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// JSON-facing description of a set of elements.
///
/// ```json
/// { "elements": [ { "source": "title.png", "tags": ["disrupt", "dsrpt-blocks"] } ] }
/// ```
pub struct Scene {
    /// Elements in document order. Element handles are assigned from this order, starting
    /// at 1.
    pub elements: Vec<SceneElement>,
}

impl Scene {
    /// Parse a scene from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> DisruptResult<Self> {
        let scene: Self = serde_json::from_reader(r)
            .map_err(|e| DisruptError::serde(format!("parse scene JSON: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> DisruptResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DisruptError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check element sources and tags.
    pub fn validate(&self) -> DisruptResult<()> {
        for (i, el) in self.elements.iter().enumerate() {
            validate_rel_source(&el.source, &format!("elements[{i}].source"))?;
            for tag in &el.tags {
                if tag.is_empty() || tag.chars().any(char::is_whitespace) {
                    return Err(DisruptError::validation(format!(
                        "elements[{i}].tags contains an invalid class tag '{tag}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn validate_rel_source(source: &str, field: &str) -> DisruptResult<()> {
    if source.trim().is_empty() {
        return Err(DisruptError::validation(format!(
            "{field} must be non-empty"
        )));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') || Path::new(source).is_absolute() {
        return Err(DisruptError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    if s.split('/').any(|part| part == "..") {
        return Err(DisruptError::validation(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
