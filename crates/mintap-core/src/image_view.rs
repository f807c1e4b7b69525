//! Sizing state of an embedded image node.
//!
//! [`ImageNodeView`] is the resize engine's caller: it tracks the image's
//! natural size and load state, derives the width ceiling from a fixed
//! maximum height, and writes committed dimensions back to the document node
//! through [`NodeAttributes`].

use serde::{Deserialize, Serialize};

use crate::geometry::{Dimensions, ResizeDirection};
use crate::keys::{EventOutcome, KeyEvent};
use crate::resize::{DragResize, InputListeners, PointerEvent, ResizeConfig, ResizeOutput};

pub const MAX_HEIGHT: f64 = 600.0;
pub const MIN_WIDTH: f64 = 120.0;
/// Grid step as a percentage of the width ceiling.
pub const GRID_INTERVAL: f64 = 0.1;
/// At or below this width the image's action buttons collapse into a menu.
pub const MERGE_THRESHOLD: f64 = 180.0;

/// Attributes stored on an image node in the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttrs {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Host document access for one image node.
pub trait NodeAttributes {
    /// Select the node in the editor.
    fn focus(&mut self);
    /// Persist new dimensions on the node.
    fn update_attributes(&mut self, dimensions: Dimensions);
}

/// Sizing limits for image nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageSizing {
    pub max_height: f64,
    pub min_width: f64,
    pub grid_interval: f64,
}

impl Default for ImageSizing {
    fn default() -> Self {
        Self {
            max_height: MAX_HEIGHT,
            min_width: MIN_WIDTH,
            grid_interval: GRID_INTERVAL,
        }
    }
}

impl ImageSizing {
    /// Width at which an image of the given natural size reaches the maximum
    /// height. Unbounded while the natural height is unknown.
    pub fn max_width_for(&self, natural: Dimensions) -> f64 {
        natural
            .aspect_ratio()
            .map_or(f64::INFINITY, |ratio| self.max_height * ratio)
    }

    fn resize_config(&self, natural: Dimensions) -> ResizeConfig {
        ResizeConfig {
            content: natural,
            grid_interval: self.grid_interval,
            min_width: self.min_width,
            max_width: self.max_width_for(natural),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    Failed,
}

/// View state for one rendered image node.
#[derive(Debug, Clone)]
pub struct ImageNodeView {
    attrs: ImageAttrs,
    sizing: ImageSizing,
    natural: Dimensions,
    load_state: LoadState,
    active_handle: Option<ResizeDirection>,
    resize: DragResize,
}

impl ImageNodeView {
    /// Until the image loads, the stored attributes stand in for its natural
    /// size.
    pub fn new(attrs: ImageAttrs, sizing: ImageSizing) -> Self {
        let natural = Dimensions::new(attrs.width.unwrap_or(0.0), attrs.height.unwrap_or(0.0));
        let resize = DragResize::new(sizing.resize_config(natural), natural);
        Self {
            attrs,
            sizing,
            natural,
            load_state: LoadState::Loading,
            active_handle: None,
            resize,
        }
    }

    pub fn attrs(&self) -> &ImageAttrs {
        &self.attrs
    }

    pub fn natural_size(&self) -> Dimensions {
        self.natural
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn max_width(&self) -> f64 {
        self.sizing.max_width_for(self.natural)
    }

    pub fn output(&self) -> ResizeOutput {
        self.resize.output()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.resize.dimensions()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_resizing()
    }

    /// Handle currently being dragged, cleared whenever no resize is active.
    pub fn active_handle(&self) -> Option<ResizeDirection> {
        self.active_handle
    }

    pub fn should_merge(&self) -> bool {
        self.resize.current_width() <= MERGE_THRESHOLD
    }

    /// The image finished loading with the given natural size.
    ///
    /// A node without a stored width adopts the natural width.
    pub fn on_image_load(&mut self, natural: Dimensions) {
        self.natural = natural;
        self.load_state = LoadState::Loaded;
        self.resize.set_config(self.sizing.resize_config(natural));
        if self.attrs.width.is_none() {
            self.resize.update_dimensions(|d| d.with_width(natural.width));
        }
        tracing::debug!(
            target: "mintap::image",
            src = %self.attrs.src,
            width = natural.width,
            height = natural.height,
            max_width = self.max_width(),
            "image loaded"
        );
    }

    pub fn on_image_error(&mut self) {
        self.load_state = LoadState::Failed;
        tracing::debug!(target: "mintap::image", src = %self.attrs.src, "image failed to load");
    }

    /// Start dragging a handle. Handles only exist once the image has
    /// loaded, so a view still loading or showing an error ignores this.
    pub fn resize_start(
        &mut self,
        direction: ResizeDirection,
        event: &PointerEvent,
        listeners: &mut impl InputListeners,
    ) -> EventOutcome {
        if self.load_state != LoadState::Loaded {
            tracing::debug!(
                target: "mintap::image",
                state = ?self.load_state,
                "resize ignored before image load"
            );
            return EventOutcome::NotHandled;
        }
        let outcome = self.resize.initiate_resize(direction, event, listeners);
        if outcome.is_handled() {
            self.active_handle = Some(direction);
        }
        outcome
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> EventOutcome {
        self.resize.handle_pointer_move(event)
    }

    /// End the drag, selecting the node and persisting its new size.
    pub fn pointer_up(
        &mut self,
        event: &PointerEvent,
        listeners: &mut impl InputListeners,
        node: &mut impl NodeAttributes,
    ) -> EventOutcome {
        let mut committed = None;
        let outcome = self.resize.handle_pointer_up(event, listeners, |dimensions| {
            node.focus();
            node.update_attributes(dimensions);
            committed = Some(dimensions);
        });
        if let Some(dimensions) = committed {
            self.attrs.width = Some(dimensions.width);
            self.attrs.height = Some(dimensions.height);
        }
        self.sync_active_handle();
        outcome
    }

    pub fn keydown(
        &mut self,
        event: &KeyEvent,
        listeners: &mut impl InputListeners,
    ) -> EventOutcome {
        let outcome = self.resize.handle_keydown(event, listeners);
        self.sync_active_handle();
        outcome
    }

    fn sync_active_handle(&mut self) {
        if !self.resize.is_resizing() {
            self.active_handle = None;
        }
    }
}
