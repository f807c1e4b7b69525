use mintap_core::{
    Dimensions, DragResize, EventOutcome, ImageAttrs, ImageNodeView, ImageSizing, Key, KeyEvent,
    ListenerRegistry, NodeAttributes, PointerEvent, ResizeConfig, ResizeDirection,
};

fn config() -> ResizeConfig {
    ResizeConfig {
        content: Dimensions::new(400.0, 200.0),
        grid_interval: 10.0,
        min_width: 50.0,
        max_width: 1000.0,
    }
}

#[test]
fn escape_reverts_exactly() {
    let mut engine = DragResize::new(config(), Dimensions::new(200.0, 100.0));
    let mut listeners = ListenerRegistry::default();

    engine.initiate_resize(ResizeDirection::Right, &PointerEvent::new(100.0), &mut listeners);
    engine.handle_pointer_move(&PointerEvent::new(150.0));
    assert_eq!(engine.current_width(), 300.0);

    engine.handle_keydown(&KeyEvent::new(Key::Escape), &mut listeners);
    let output = engine.output();
    assert_eq!(output.width, 200.0);
    assert_eq!(output.height, 100.0);
    assert!(!output.is_resizing);
    assert!(!listeners.is_attached());
}

#[test]
fn drag_commits_once_with_final_dimensions() {
    let mut engine = DragResize::new(config(), Dimensions::new(200.0, 100.0));
    let mut listeners = ListenerRegistry::default();
    let mut commits = Vec::new();

    engine.initiate_resize(ResizeDirection::Right, &PointerEvent::new(0.0), &mut listeners);
    for x in [10.0, 40.0, 120.0, 260.0] {
        engine.handle_pointer_move(&PointerEvent::new(x));
    }
    let outcome = engine.handle_pointer_up(&PointerEvent::new(260.0), &mut listeners, |d| {
        commits.push(d)
    });

    assert_eq!(outcome, EventOutcome::Handled);
    // 200 + 2 * 260 = 720, snapped to the 100px grid.
    assert_eq!(commits, vec![Dimensions::new(700.0, 350.0)]);
    assert_eq!(engine.dimensions(), commits[0]);
}

#[test]
fn replaying_a_position_is_idempotent() {
    let mut engine = DragResize::new(config(), Dimensions::new(200.0, 100.0));
    let mut listeners = ListenerRegistry::default();

    engine.initiate_resize(ResizeDirection::Left, &PointerEvent::new(500.0), &mut listeners);
    engine.handle_pointer_move(&PointerEvent::new(430.0));
    let first = engine.dimensions();
    engine.handle_pointer_move(&PointerEvent::new(200.0));
    engine.handle_pointer_move(&PointerEvent::new(430.0));
    assert_eq!(engine.dimensions(), first);
}

#[derive(Default)]
struct Node {
    attrs: Vec<Dimensions>,
}

impl NodeAttributes for Node {
    fn focus(&mut self) {}

    fn update_attributes(&mut self, dimensions: Dimensions) {
        self.attrs.push(dimensions);
    }
}

#[test]
fn image_view_stays_within_max_height() {
    let mut view = ImageNodeView::new(
        ImageAttrs {
            src: "https://example.com/wide.png".into(),
            ..Default::default()
        },
        ImageSizing::default(),
    );
    view.on_image_load(Dimensions::new(1600.0, 800.0));
    assert_eq!(view.max_width(), 1200.0);

    let mut listeners = ListenerRegistry::default();
    let mut node = Node::default();
    view.resize_start(ResizeDirection::Right, &PointerEvent::new(0.0), &mut listeners);
    view.pointer_move(&PointerEvent::new(4000.0));
    view.pointer_up(&PointerEvent::new(4000.0), &mut listeners, &mut node);

    assert_eq!(node.attrs, vec![Dimensions::new(1200.0, 600.0)]);
    assert_eq!(view.attrs().height, Some(600.0));
}
