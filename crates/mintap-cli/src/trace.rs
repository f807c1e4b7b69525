//! Replay of recorded resize gestures against an image node.

use mintap_core::{
    Dimensions, EventOutcome, ImageAttrs, ImageNodeView, ImageSizing, InputListeners, Key,
    KeyEvent, MintapError, NodeAttributes, PointerEvent, ResizeDirection,
};
use serde::Deserialize;

/// A recorded gesture: the node's stored attributes, the size the image
/// reports once loaded, and the events in the order the host saw them.
#[derive(Debug, Clone, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub attrs: ImageAttrs,
    pub natural: Option<Dimensions>,
    pub events: Vec<TraceEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TraceEvent {
    Load,
    Error,
    Down { direction: ResizeDirection, x: f64 },
    Move { x: f64 },
    Up { x: Option<f64> },
    Key { key: String },
}

impl Trace {
    pub fn parse(raw: &str) -> Result<Self, MintapError> {
        let trace: Trace = serde_json::from_str(raw)?;
        let needs_natural = trace
            .events
            .iter()
            .any(|event| matches!(event, TraceEvent::Load));
        if needs_natural && trace.natural.is_none() {
            return Err(MintapError::Trace(
                "a `load` event needs `natural` dimensions".into(),
            ));
        }
        Ok(trace)
    }
}

/// Global listeners as seen from the command line: just a log line.
#[derive(Debug, Default)]
pub struct LoggedListeners {
    attached: bool,
}

impl InputListeners for LoggedListeners {
    fn attach(&mut self) {
        self.attached = true;
        tracing::debug!(target: "mintap::cli", "listeners attached");
    }

    fn detach(&mut self) {
        self.attached = false;
        tracing::debug!(target: "mintap::cli", "listeners detached");
    }
}

/// Collects what the node would have persisted.
#[derive(Debug, Default)]
pub struct RecordedNode {
    pub focused: usize,
    pub commits: Vec<Dimensions>,
}

impl NodeAttributes for RecordedNode {
    fn focus(&mut self) {
        self.focused += 1;
    }

    fn update_attributes(&mut self, dimensions: Dimensions) {
        self.commits.push(dimensions);
    }
}

#[derive(Debug)]
pub struct Replay {
    pub view: ImageNodeView,
    pub node: RecordedNode,
    pub ignored: usize,
}

/// Run every event of `trace` through a fresh [`ImageNodeView`].
pub fn replay(trace: Trace, sizing: ImageSizing) -> Replay {
    let mut view = ImageNodeView::new(trace.attrs, sizing);
    let mut listeners = LoggedListeners::default();
    let mut node = RecordedNode::default();
    let mut ignored = 0;
    let mut last_x = 0.0;

    for event in trace.events {
        let outcome = match event {
            TraceEvent::Load => {
                // Presence checked by `Trace::parse`.
                if let Some(natural) = trace.natural {
                    view.on_image_load(natural);
                }
                EventOutcome::Handled
            }
            TraceEvent::Error => {
                view.on_image_error();
                EventOutcome::Handled
            }
            TraceEvent::Down { direction, x } => {
                last_x = x;
                view.resize_start(direction, &PointerEvent::new(x), &mut listeners)
            }
            TraceEvent::Move { x } => {
                last_x = x;
                view.pointer_move(&PointerEvent::new(x))
            }
            TraceEvent::Up { x } => {
                let x = x.unwrap_or(last_x);
                view.pointer_up(&PointerEvent::new(x), &mut listeners, &mut node)
            }
            TraceEvent::Key { key } => {
                view.keydown(&KeyEvent::new(Key::parse(&key)), &mut listeners)
            }
        };
        if !outcome.is_handled() {
            ignored += 1;
        }
    }

    if listeners.attached {
        tracing::warn!(target: "mintap::cli", "trace ended mid-gesture");
    }

    Replay {
        view,
        node,
        ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = r#"{
        "attrs": { "src": "cat.png" },
        "natural": { "width": 1000, "height": 600 },
        "events": [
            { "type": "load" },
            { "type": "move", "x": 10 },
            { "type": "down", "direction": "left", "x": 400 },
            { "type": "move", "x": 550 },
            { "type": "up" }
        ]
    }"#;

    #[test]
    fn test_replay_commits_final_size() {
        let trace = Trace::parse(TRACE).unwrap();
        let replay = replay(trace, ImageSizing::default());

        assert_eq!(replay.ignored, 1);
        assert_eq!(replay.node.focused, 1);
        assert_eq!(replay.node.commits.len(), 1);
        let committed = replay.node.commits[0];
        assert!((committed.width - 700.0).abs() < 1e-9);
        assert!((committed.height - 420.0).abs() < 1e-9);
        assert!(!replay.view.is_resizing());
    }

    #[test]
    fn test_escape_in_trace_commits_nothing() {
        let trace = Trace::parse(
            r#"{
                "natural": { "width": 600, "height": 600 },
                "events": [
                    { "type": "load" },
                    { "type": "down", "direction": "right", "x": 0 },
                    { "type": "move", "x": -100 },
                    { "type": "key", "key": "Escape" },
                    { "type": "up", "x": -100 }
                ]
            }"#,
        )
        .unwrap();
        let replay = replay(trace, ImageSizing::default());

        assert!(replay.node.commits.is_empty());
        assert_eq!(replay.view.dimensions().width, 600.0);
        assert_eq!(replay.ignored, 1);
    }

    #[test]
    fn test_load_without_natural_is_rejected() {
        let err = Trace::parse(r#"{ "events": [{ "type": "load" }] }"#).unwrap_err();
        insta::assert_snapshot!(err, @"invalid trace: a `load` event needs `natural` dimensions");
    }
}
