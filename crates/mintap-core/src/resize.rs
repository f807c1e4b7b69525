//! Drag-to-resize engine for aspect-locked elements.
//!
//! [`DragResize`] turns a pointer drag on a left or right edge handle into
//! width/height updates that are snapped to a grid, clamped between a minimum
//! width and a per-session boundary, and locked to the content's aspect ratio.
//!
//! The engine is an explicit state machine. Hosts feed it pointer and key
//! events; global listener registration is delegated to an
//! [`InputListeners`] implementation so that listeners exist only while a
//! session is active.
//!
//! ```
//! use mintap_core::geometry::{Dimensions, ResizeDirection};
//! use mintap_core::resize::{DragResize, ListenerRegistry, PointerEvent, ResizeConfig};
//!
//! let config = ResizeConfig {
//!     content: Dimensions::new(400.0, 200.0),
//!     grid_interval: 10.0,
//!     min_width: 50.0,
//!     max_width: 1000.0,
//! };
//! let mut engine = DragResize::new(config, Dimensions::new(200.0, 100.0));
//! let mut listeners = ListenerRegistry::default();
//!
//! engine.initiate_resize(ResizeDirection::Right, &PointerEvent::new(500.0), &mut listeners);
//! engine.handle_pointer_move(&PointerEvent::new(550.0));
//!
//! let mut committed = None;
//! engine.handle_pointer_up(&PointerEvent::new(550.0), &mut listeners, |dims| {
//!     committed = Some(dims)
//! });
//! assert_eq!(committed, Some(Dimensions::new(300.0, 150.0)));
//! assert!(!listeners.is_attached());
//! ```

use crate::geometry::{Dimensions, ResizeDirection};
use crate::keys::{EventOutcome, KeyEvent};

/// A pointer event, reduced to what the engine reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Horizontal position relative to the document.
    pub page_x: f64,
}

impl PointerEvent {
    pub const fn new(page_x: f64) -> Self {
        Self { page_x }
    }
}

/// Host-side registration of the global pointer-move, pointer-up and
/// keydown listeners.
///
/// The engine calls `attach` once when a session starts and `detach` once
/// when it ends, so the host never keeps listeners around while idle.
pub trait InputListeners {
    fn attach(&mut self);
    fn detach(&mut self);
}

/// Bookkeeping [`InputListeners`] for hosts that poll instead of
/// registering callbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerRegistry {
    attached: bool,
    attach_count: usize,
}

impl ListenerRegistry {
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Number of times listeners were attached over the registry's lifetime.
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }
}

impl InputListeners for ListenerRegistry {
    fn attach(&mut self) {
        debug_assert!(!self.attached, "listeners attached twice");
        self.attached = true;
        self.attach_count += 1;
    }

    fn detach(&mut self) {
        debug_assert!(self.attached, "listeners detached while idle");
        self.attached = false;
    }
}

/// Sizing constraints for a resizable element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeConfig {
    /// Natural size of the content (e.g. the image's pixel size).
    pub content: Dimensions,
    /// Snapping increment as a percentage of the boundary width.
    pub grid_interval: f64,
    /// Configured minimum width.
    pub min_width: f64,
    /// Absolute width ceiling, captured as the boundary when a session starts.
    pub max_width: f64,
}

impl ResizeConfig {
    /// Width of one grid step for the given boundary.
    pub fn grid_unit(&self, boundary_width: f64) -> f64 {
        (self.grid_interval / 100.0) * boundary_width
    }

    /// Smallest width a resize can produce.
    ///
    /// Never below the configured minimum, and never below one grid unit
    /// unless the content itself is narrower than that.
    pub fn effective_min_width(&self, boundary_width: f64) -> f64 {
        self.min_width
            .max(self.content.width.min(self.grid_unit(boundary_width)))
    }

    /// Clamp `proposed` into `[effective_min_width, boundary_width]`.
    ///
    /// The boundary wins if the minimum exceeds it.
    pub fn constrain_width(&self, proposed: f64, boundary_width: f64) -> f64 {
        boundary_width.min(proposed.max(self.effective_min_width(boundary_width)))
    }

    /// Round `width` to the nearest grid step.
    ///
    /// A grid unit that is not finite and positive (unbounded boundary,
    /// zero interval) disables snapping.
    pub fn snap_width(&self, width: f64, boundary_width: f64) -> f64 {
        let unit = self.grid_unit(boundary_width);
        if unit.is_finite() && unit > 0.0 {
            (width / unit).round() * unit
        } else {
            width
        }
    }

    /// Height that keeps `width` at the content's aspect ratio.
    ///
    /// Content without a width has no ratio, so its height is used as-is.
    pub fn height_for(&self, width: f64) -> f64 {
        match self.content.height_ratio() {
            Some(ratio) => width * ratio,
            None => self.content.height,
        }
    }
}

/// State of one in-flight resize gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub direction: ResizeDirection,
    pub origin_x: f64,
    /// Dimensions at gesture start, restored verbatim on Escape.
    pub initial: Dimensions,
    pub boundary_width: f64,
}

/// Snapshot handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOutput {
    pub width: f64,
    pub height: f64,
    pub is_resizing: bool,
}

/// Pointer-down handler for one edge of an element.
///
/// Returned by [`DragResize::resize_handle`] so hosts can bind one handler
/// per handle element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeHandle {
    direction: ResizeDirection,
}

impl ResizeHandle {
    pub fn direction(&self) -> ResizeDirection {
        self.direction
    }

    pub fn on_pointer_down(
        self,
        engine: &mut DragResize,
        event: &PointerEvent,
        listeners: &mut impl InputListeners,
    ) -> EventOutcome {
        engine.initiate_resize(self.direction, event, listeners)
    }
}

/// Resize engine for one element instance.
#[derive(Debug, Clone)]
pub struct DragResize {
    config: ResizeConfig,
    current: Dimensions,
    session: Option<ResizeSession>,
}

impl DragResize {
    pub fn new(config: ResizeConfig, initial: Dimensions) -> Self {
        Self {
            config,
            current: initial,
            session: None,
        }
    }

    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    /// Replace the sizing constraints.
    ///
    /// An active session keeps the boundary it captured at start.
    pub fn set_config(&mut self, config: ResizeConfig) {
        self.config = config;
    }

    /// Pointer-down handler for the given edge.
    pub fn resize_handle(direction: ResizeDirection) -> ResizeHandle {
        ResizeHandle { direction }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.current
    }

    pub fn current_width(&self) -> f64 {
        self.current.width
    }

    pub fn current_height(&self) -> f64 {
        self.current.height
    }

    pub fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    pub fn direction(&self) -> Option<ResizeDirection> {
        self.session.map(|s| s.direction)
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    pub fn output(&self) -> ResizeOutput {
        ResizeOutput {
            width: self.current.width,
            height: self.current.height,
            is_resizing: self.is_resizing(),
        }
    }

    /// Overwrite the current dimensions.
    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.current = dimensions;
    }

    /// Update the current dimensions from their previous value.
    ///
    /// Used to seed the width once the content's natural size is known.
    pub fn update_dimensions(&mut self, update: impl FnOnce(Dimensions) -> Dimensions) {
        self.current = update(self.current);
    }

    /// Start a resize gesture from the given edge.
    ///
    /// Only one session may be active per element: a pointer-down while
    /// resizing is rejected and leaves the running gesture untouched.
    pub fn initiate_resize(
        &mut self,
        direction: ResizeDirection,
        event: &PointerEvent,
        listeners: &mut impl InputListeners,
    ) -> EventOutcome {
        if let Some(active) = &self.session {
            tracing::debug!(
                target: "mintap::resize",
                active = ?active.direction,
                requested = ?direction,
                "ignoring pointer-down during active resize"
            );
            return EventOutcome::NotHandled;
        }

        let boundary_width = self.config.max_width;
        let initial = Dimensions {
            width: self.config.constrain_width(self.current.width, boundary_width),
            height: self.current.height,
        };

        self.session = Some(ResizeSession {
            direction,
            origin_x: event.page_x,
            initial,
            boundary_width,
        });
        listeners.attach();

        tracing::debug!(
            target: "mintap::resize",
            ?direction,
            origin_x = event.page_x,
            width = initial.width,
            boundary_width,
            "resize started"
        );
        EventOutcome::Handled
    }

    /// Recompute dimensions for the latest pointer position.
    ///
    /// Depends only on the session and `event`, so replaying a position
    /// always yields the same dimensions.
    pub fn handle_pointer_move(&mut self, event: &PointerEvent) -> EventOutcome {
        let Some(session) = self.session else {
            return EventOutcome::NotHandled;
        };
        self.current = self.dimensions_at(&session, event.page_x);
        tracing::trace!(
            target: "mintap::resize",
            x = event.page_x,
            width = self.current.width,
            height = self.current.height,
            "resize move"
        );
        EventOutcome::Handled
    }

    /// Finish the gesture and commit the final dimensions.
    ///
    /// `on_commit` runs exactly once per completed gesture and never when
    /// the engine is idle.
    pub fn handle_pointer_up(
        &mut self,
        _event: &PointerEvent,
        listeners: &mut impl InputListeners,
        on_commit: impl FnOnce(Dimensions),
    ) -> EventOutcome {
        if self.session.take().is_none() {
            return EventOutcome::NotHandled;
        }
        listeners.detach();

        tracing::debug!(
            target: "mintap::resize",
            width = self.current.width,
            height = self.current.height,
            "resize committed"
        );
        on_commit(self.current);
        EventOutcome::Handled
    }

    /// Escape aborts the gesture and restores the starting dimensions.
    pub fn handle_keydown(
        &mut self,
        event: &KeyEvent,
        listeners: &mut impl InputListeners,
    ) -> EventOutcome {
        if !event.is_escape() {
            return EventOutcome::NotHandled;
        }
        let Some(session) = self.session.take() else {
            return EventOutcome::NotHandled;
        };
        listeners.detach();
        self.current = session.initial;

        tracing::debug!(
            target: "mintap::resize",
            width = self.current.width,
            height = self.current.height,
            "resize cancelled"
        );
        EventOutcome::Handled
    }

    fn dimensions_at(&self, session: &ResizeSession, page_x: f64) -> Dimensions {
        let boundary = session.boundary_width;
        let delta = session.direction.movement_delta(session.origin_x, page_x);
        let aligned = self
            .config
            .snap_width(session.initial.width + delta, boundary);
        let width = self.config.constrain_width(aligned, boundary);

        Dimensions {
            width,
            height: self.config.height_for(width),
        }
    }
}
