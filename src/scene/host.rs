use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::assets::decode::load_image;
use crate::engine::host::{
    CaptureService, ElementDiscovery, OverlayPlacement, Snapshot, VisibilityControl,
};
use crate::foundation::core::{ElementHandle, InstanceId, SurfaceSize};
use crate::foundation::error::{DisruptError, DisruptResult};
use crate::render::pixmap::Pixmap;
use crate::render::surface::Surface;
use crate::scene::model::Scene;

/// Something the engine asked the host to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    /// An element was rasterized.
    Captured(ElementHandle),
    /// An element was hidden.
    Hidden(ElementHandle),
    /// An element was shown again.
    Shown(ElementHandle),
    /// An overlay was placed over an element.
    OverlayPlaced {
        /// Owning instance.
        instance: InstanceId,
        /// Covered element.
        element: ElementHandle,
    },
    /// An overlay was detached.
    OverlayRemoved(InstanceId),
}

#[derive(Clone, Debug)]
enum Source {
    File(PathBuf),
    Image(Pixmap),
}

#[derive(Clone, Debug)]
struct Element {
    source: Source,
    tags: BTreeSet<String>,
    visible: bool,
}

/// Overlay placed by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedOverlay {
    /// Covered element.
    pub element: ElementHandle,
    /// Overlay size at placement time.
    pub size: SurfaceSize,
}

/// [`crate::Host`] backed by a [`Scene`]: element pixels come from image files decoded at
/// capture time.
#[derive(Clone, Debug, Default)]
pub struct SceneHost {
    elements: BTreeMap<ElementHandle, Element>,
    overlays: BTreeMap<InstanceId, PlacedOverlay>,
    events: Vec<SceneEvent>,
}

impl SceneHost {
    /// Host for `scene`, resolving element sources against `base_dir`.
    pub fn new(scene: &Scene, base_dir: &Path) -> Self {
        let mut host = Self::default();
        for el in &scene.elements {
            host.insert(Source::File(base_dir.join(&el.source)), el.tags.clone());
        }
        host
    }

    /// Load a scene file; sources resolve relative to the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> DisruptResult<Self> {
        let path = path.as_ref();
        let scene = Scene::from_path(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::new(&scene, base))
    }

    /// Add an in-memory element and return its handle.
    pub fn push_image<I, S>(&mut self, image: Pixmap, tags: I) -> ElementHandle
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(Source::Image(image), tags.into_iter().map(Into::into).collect())
    }

    fn insert(&mut self, source: Source, tags: BTreeSet<String>) -> ElementHandle {
        let handle = ElementHandle(self.elements.len() as u64 + 1);
        self.elements.insert(
            handle,
            Element {
                source,
                tags,
                visible: true,
            },
        );
        handle
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Return `true` when the scene has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether `element` is currently shown. Unknown elements are reported hidden.
    pub fn is_visible(&self, element: ElementHandle) -> bool {
        self.elements.get(&element).is_some_and(|el| el.visible)
    }

    /// Overlays currently placed, by instance.
    pub fn overlays(&self) -> &BTreeMap<InstanceId, PlacedOverlay> {
        &self.overlays
    }

    /// Every collaborator call so far, in order.
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    fn element_mut(&mut self, element: ElementHandle) -> DisruptResult<&mut Element> {
        self.elements
            .get_mut(&element)
            .ok_or_else(|| DisruptError::validation(format!("unknown {element}")))
    }
}

impl CaptureService for SceneHost {
    fn capture(&mut self, element: ElementHandle) -> DisruptResult<Snapshot> {
        let el = self
            .elements
            .get(&element)
            .ok_or_else(|| DisruptError::capture_failed(element, "unknown element"))?;
        let image = match &el.source {
            Source::Image(image) => image.clone(),
            Source::File(path) => load_image(path)
                .map_err(|e| DisruptError::capture_failed(element, format!("{e:#}")))?,
        };
        self.events.push(SceneEvent::Captured(element));
        tracing::debug!(%element, width = image.width(), height = image.height(), "captured");
        Ok(Snapshot::from_image(image))
    }
}

impl ElementDiscovery for SceneHost {
    fn find_disruptable(&self, target_tag: &str) -> Vec<ElementHandle> {
        self.elements
            .iter()
            .filter(|(_, el)| el.tags.contains(target_tag))
            .map(|(&handle, _)| handle)
            .collect()
    }

    fn class_tags(&self, element: ElementHandle) -> BTreeSet<String> {
        self.elements
            .get(&element)
            .map(|el| el.tags.clone())
            .unwrap_or_default()
    }
}

impl VisibilityControl for SceneHost {
    fn hide(&mut self, element: ElementHandle) -> DisruptResult<()> {
        self.element_mut(element)?.visible = false;
        self.events.push(SceneEvent::Hidden(element));
        Ok(())
    }

    fn show(&mut self, element: ElementHandle) -> DisruptResult<()> {
        self.element_mut(element)?.visible = true;
        self.events.push(SceneEvent::Shown(element));
        Ok(())
    }
}

impl OverlayPlacement for SceneHost {
    fn position_overlay(
        &mut self,
        element: ElementHandle,
        instance: InstanceId,
        surface: &Surface,
    ) -> DisruptResult<()> {
        self.overlays.insert(
            instance,
            PlacedOverlay {
                element,
                size: surface.size(),
            },
        );
        self.events.push(SceneEvent::OverlayPlaced { instance, element });
        Ok(())
    }

    fn remove_overlay(&mut self, instance: InstanceId) -> DisruptResult<()> {
        if self.overlays.remove(&instance).is_none() {
            return Err(DisruptError::NotFound(instance));
        }
        self.events.push(SceneEvent::OverlayRemoved(instance));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/host.rs"]
mod tests;
