//! Disrupt plays short glitch-style transitions over rasterized snapshots of UI elements.
//!
//! An [`Engine`] asks its [`Host`] for every element tagged as a disruption target, captures
//! each one into a [`Pixmap`], hides the element and animates a procedural effect on an
//! overlay [`Surface`] until the effect settles back onto the untouched snapshot. The overlay
//! is then removed and the element shown again.
//!
//! # Moving parts
//!
//! - **Effects**: a registry of [`Effect`] definitions (`setup` once, `animate` per frame).
//!   Five built-ins ship with the crate; see [`EffectRegistry::builtin`].
//! - **Instances**: one per captured element, each with its own random stream derived from
//!   [`EngineOpts::seed`].
//! - **Scheduling**: a [`FrameClock`] hands out ticks; the host calls [`Engine::frame`] once
//!   per display refresh.
//! - **Hosts**: [`SceneHost`] drives the engine from a JSON [`Scene`] of tagged images.
//!
//! Pixels are premultiplied RGBA8 throughout; PNG decode and encode happen at the edges.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub mod effects;
pub mod engine;
pub(crate) mod render;
pub mod scene;

pub use crate::assets::decode::{decode_image, load_image, save_png};
pub use crate::effects::{
    AnyEffectState, DEFAULT_EFFECT, Effect, EffectRegistry, EffectState, ErasedEffect,
    Generators, SetupCtx, Sprite,
};
pub use crate::engine::{
    CaptureService, DisruptionInstance, ElementDiscovery, Engine, EngineOpts, FrameClock,
    FrameReport, Host, LoopProgress, OverlayPlacement, Snapshot, TickQueue, VisibilityControl,
};
pub use crate::foundation::core::{
    ElementHandle, InstanceId, Point, Rect, Rgba8Premul, SurfaceSize, TickHandle, Timestamp, Vec2,
};
pub use crate::foundation::error::{DisruptError, DisruptResult};
pub use crate::foundation::math::Rng64;
pub use crate::render::composite::PremulRgba8;
pub use crate::render::pixmap::Pixmap;
pub use crate::render::surface::Surface;
pub use crate::scene::{PlacedOverlay, Scene, SceneElement, SceneEvent, SceneHost};
