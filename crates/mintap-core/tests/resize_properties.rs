use mintap_core::{
    Dimensions, DragResize, ListenerRegistry, PointerEvent, ResizeConfig, ResizeDirection,
};
use proptest::prelude::*;

const EPS: f64 = 1e-6;

fn direction() -> impl Strategy<Value = ResizeDirection> {
    prop_oneof![Just(ResizeDirection::Left), Just(ResizeDirection::Right)]
}

prop_compose! {
    fn resize_config()(
        content_width in 1.0f64..4000.0,
        content_height in 1.0f64..4000.0,
        grid_interval in 0.1f64..25.0,
        min_width in 0.0f64..300.0,
        extra in 0.0f64..3000.0,
    ) -> ResizeConfig {
        ResizeConfig {
            content: Dimensions::new(content_width, content_height),
            grid_interval,
            min_width,
            max_width: min_width + extra,
        }
    }
}

struct Dragged {
    config: ResizeConfig,
    boundary: f64,
    dimensions: Dimensions,
}

fn drag(config: ResizeConfig, start_width: f64, direction: ResizeDirection, x: f64) -> Dragged {
    let start = Dimensions::new(start_width, config.height_for(start_width));
    let mut engine = DragResize::new(config, start);
    let mut listeners = ListenerRegistry::default();
    engine.initiate_resize(direction, &PointerEvent::new(0.0), &mut listeners);
    let boundary = engine.session().unwrap().boundary_width;
    engine.handle_pointer_move(&PointerEvent::new(x));
    Dragged {
        config,
        boundary,
        dimensions: engine.dimensions(),
    }
}

proptest! {
    #[test]
    fn height_follows_content_aspect_ratio(
        config in resize_config(),
        start_width in 0.0f64..2000.0,
        direction in direction(),
        x in -3000.0f64..3000.0,
    ) {
        let Dragged { config, dimensions, .. } = drag(config, start_width, direction, x);
        let expected = config.content.height / config.content.width;
        if dimensions.width > 0.0 {
            let ratio = dimensions.height / dimensions.width;
            prop_assert!((ratio - expected).abs() <= EPS * expected.max(1.0));
        }
    }

    #[test]
    fn width_stays_within_bounds(
        config in resize_config(),
        start_width in 0.0f64..2000.0,
        direction in direction(),
        x in -3000.0f64..3000.0,
    ) {
        let Dragged { config, boundary, dimensions } = drag(config, start_width, direction, x);
        let min = config.effective_min_width(boundary);
        prop_assert!(dimensions.width <= boundary + EPS);
        if min <= boundary {
            prop_assert!(dimensions.width >= min - EPS);
        }
    }

    #[test]
    fn unclamped_width_lands_on_grid(
        config in resize_config(),
        start_width in 0.0f64..2000.0,
        direction in direction(),
        x in -3000.0f64..3000.0,
    ) {
        let Dragged { config, boundary, dimensions } = drag(config, start_width, direction, x);
        let unit = config.grid_unit(boundary);
        let min = config.effective_min_width(boundary);
        let width = dimensions.width;
        let clamped = (width - min).abs() <= EPS || (width - boundary).abs() <= EPS;
        if !clamped && unit > 0.0 {
            let steps = width / unit;
            prop_assert!((steps - steps.round()).abs() <= 1e-6 * steps.abs().max(1.0));
        }
    }
}
