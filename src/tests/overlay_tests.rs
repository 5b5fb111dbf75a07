//! Tests for the overlay layer.

use lazyimg_ui::Event;

use super::mounted;
use crate::overlay::OverlayTrigger;
use crate::props::ImageProps;

#[test]
fn test_hover_overlay_follows_pointer() {
    let mut image = mounted(ImageProps::new("a.jpg").with_overlay("Preview", OverlayTrigger::Hover));
    assert!(image.wires_pointer_events());
    assert!(!image.render().overlay_visible());

    image.dispatch(Event::PointerEntered.into());
    assert!(image.render().overlay_visible());

    image.dispatch(Event::PointerLeft.into());
    let plan = image.render();
    assert!(!plan.overlay_visible());
    assert!(plan.overlay.is_some(), "content stays mounted");
}

#[test]
fn test_always_overlay_ignores_pointer() {
    let mut image = mounted(ImageProps::new("a.jpg").with_overlay("Preview", OverlayTrigger::Always));
    assert!(!image.wires_pointer_events());
    assert!(image.render().overlay_visible());

    image.dispatch(Event::PointerLeft.into());
    assert!(image.render().overlay_visible());
}

#[test]
fn test_unset_trigger_is_always() {
    let mut props = ImageProps::new("a.jpg");
    props.overlay_content = Some("Preview".into());
    let mut image = mounted(props);

    image.dispatch(Event::PointerEntered.into());
    image.dispatch(Event::PointerLeft.into());
    assert!(image.render().overlay_visible());
}

#[test]
fn test_no_overlay_without_content() {
    let mut props = ImageProps::new("a.jpg");
    props.overlay_trigger = Some(OverlayTrigger::Hover);
    let mut image = mounted(props);
    assert!(!image.wires_pointer_events());

    image.dispatch(Event::PointerEntered.into());
    assert!(image.render().overlay.is_none());
    assert!(!image.overlay_visible());
}
