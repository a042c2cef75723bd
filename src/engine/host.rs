//! Host collaborators consumed by the engine.
//!
//! The engine never touches a document, window or widget tree directly. Everything it needs
//! from the outside world goes through these traits, and [`Host`] bundles them so an engine
//! can be generic over a single host type.

use std::collections::BTreeSet;

use crate::foundation::core::{ElementHandle, InstanceId};
use crate::foundation::error::{DisruptError, DisruptResult};
use crate::render::pixmap::Pixmap;
use crate::render::surface::Surface;

/// Result of capturing one element: a blank overlay surface plus the rasterized element.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Drawing target that will sit on top of the hidden element.
    pub surface: Surface,
    /// Static copy of the element's pixels.
    pub image: Pixmap,
}

impl Snapshot {
    /// Snapshot with a transparent surface matching `image`.
    pub fn from_image(image: Pixmap) -> Self {
        Self {
            surface: Surface::new(image.size()),
            image,
        }
    }

    pub(crate) fn validate(&self) -> DisruptResult<()> {
        if self.surface.size() != self.image.size() {
            return Err(DisruptError::render(format!(
                "snapshot surface is {}x{} but image is {}x{}",
                self.surface.size().width,
                self.surface.size().height,
                self.image.width(),
                self.image.height()
            )));
        }
        Ok(())
    }
}

/// Rasterizes an element.
pub trait CaptureService {
    /// Capture `element`. May be slow; the engine finishes every capture of a batch before
    /// any animation starts.
    fn capture(&mut self, element: ElementHandle) -> DisruptResult<Snapshot>;
}

/// Finds disruption targets and reads their class tags.
pub trait ElementDiscovery {
    /// Elements carrying `target_tag`, in document order.
    fn find_disruptable(&self, target_tag: &str) -> Vec<ElementHandle>;

    /// Class tags of `element` (empty for unknown elements).
    fn class_tags(&self, element: ElementHandle) -> BTreeSet<String>;
}

/// Toggles element visibility.
pub trait VisibilityControl {
    /// Hide `element` while its overlay animates.
    fn hide(&mut self, element: ElementHandle) -> DisruptResult<()>;

    /// Restore `element`.
    fn show(&mut self, element: ElementHandle) -> DisruptResult<()>;
}

/// Places overlay surfaces over their elements.
pub trait OverlayPlacement {
    /// Put `surface` over `element` at the same position and size.
    fn position_overlay(
        &mut self,
        element: ElementHandle,
        instance: InstanceId,
        surface: &Surface,
    ) -> DisruptResult<()>;

    /// Detach the overlay of `instance`.
    fn remove_overlay(&mut self, instance: InstanceId) -> DisruptResult<()>;
}

/// Everything the engine needs from its host.
pub trait Host: CaptureService + ElementDiscovery + VisibilityControl + OverlayPlacement {}

impl<T> Host for T where
    T: CaptureService + ElementDiscovery + VisibilityControl + OverlayPlacement
{
}
