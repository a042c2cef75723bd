use super::*;
use crate::assets::decode::save_png;
use crate::foundation::core::Rgba8Premul;
use crate::scene::model::SceneElement;

fn solid(w: u32, h: u32) -> Pixmap {
    Pixmap::solid(SurfaceSize::new(w, h).unwrap(), Rgba8Premul::opaque(10, 20, 30))
}

#[test]
fn discovery_filters_by_target_tag_in_document_order() {
    let mut host = SceneHost::default();
    let a = host.push_image(solid(2, 2), ["disrupt", "dsrpt-blocks"]);
    let _b = host.push_image(solid(2, 2), ["plain"]);
    let c = host.push_image(solid(2, 2), ["disrupt"]);
    assert_eq!(host.len(), 3);
    assert_eq!(host.find_disruptable("disrupt"), vec![a, c]);
    assert!(host.class_tags(a).contains("dsrpt-blocks"));
    assert!(host.class_tags(ElementHandle(99)).is_empty());
}

#[test]
fn capture_returns_a_blank_surface_matching_the_image() {
    let mut host = SceneHost::default();
    let el = host.push_image(solid(5, 3), ["disrupt"]);
    let snap = host.capture(el).unwrap();
    assert_eq!(snap.surface.size(), snap.image.size());
    assert!(snap.surface.pixmap().is_blank());
    assert_eq!(snap.image.pixel(4, 2), [10, 20, 30, 255]);
    assert_eq!(host.events(), &[SceneEvent::Captured(el)]);
}

#[test]
fn missing_source_file_fails_capture() {
    let scene = Scene {
        elements: vec![SceneElement {
            source: "nope.png".to_owned(),
            tags: ["disrupt".to_owned()].into_iter().collect(),
        }],
    };
    let mut host = SceneHost::new(&scene, Path::new("target/unit_scene_missing"));
    let err = host.capture(ElementHandle(1)).unwrap_err();
    assert!(matches!(
        err,
        DisruptError::CaptureFailed {
            element: ElementHandle(1),
            ..
        }
    ));
    assert!(host.events().is_empty());
}

#[test]
fn from_path_resolves_sources_next_to_the_scene() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("target/unit_scene_host");
    std::fs::create_dir_all(&dir).unwrap();
    save_png(&solid(4, 4), &dir.join("a.png")).unwrap();
    std::fs::write(
        dir.join("scene.json"),
        r#"{ "elements": [ { "source": "a.png", "tags": ["disrupt"] } ] }"#,
    )
    .unwrap();

    let mut host = SceneHost::from_path(dir.join("scene.json")).unwrap();
    let snap = host.capture(ElementHandle(1)).unwrap();
    assert_eq!(snap.image, solid(4, 4));
}

#[test]
fn visibility_and_overlays_are_tracked() {
    let mut host = SceneHost::default();
    let el = host.push_image(solid(3, 3), ["disrupt"]);
    let surface = Surface::new(SurfaceSize::new(3, 3).unwrap());

    host.position_overlay(el, InstanceId(1), &surface).unwrap();
    host.hide(el).unwrap();
    assert!(!host.is_visible(el));
    assert_eq!(host.overlays()[&InstanceId(1)].element, el);

    host.show(el).unwrap();
    host.remove_overlay(InstanceId(1)).unwrap();
    assert!(host.is_visible(el));
    assert!(host.overlays().is_empty());
    assert!(host.remove_overlay(InstanceId(1)).is_err());
    assert!(host.hide(ElementHandle(42)).is_err());

    assert_eq!(
        host.events(),
        &[
            SceneEvent::OverlayPlaced {
                instance: InstanceId(1),
                element: el
            },
            SceneEvent::Hidden(el),
            SceneEvent::Shown(el),
            SceneEvent::OverlayRemoved(InstanceId(1)),
        ]
    );
}
