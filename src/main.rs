use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use log::info;
use strata::{Curve, Layer, LayerProperty, ManualLoop, Scheduler};
use strata_config::StrataConfig;

/// Headless demo: animate a layer across the configured default duration and
/// log every property change, driving the loop at a fixed 64 Hz.
fn main() -> Result<()> {
    let config = StrataConfig::load();

    let mut builder = env_logger::Builder::from_default_env();
    if let Some(filter) = &config.logging.filter {
        builder.parse_filters(filter);
    }
    let _ = builder.try_init();

    let frame_loop = ManualLoop::new();
    let scheduler = Scheduler::with_config(frame_loop.clone(), &config.animation);
    let layer = Layer::with_properties(
        &scheduler,
        [
            (LayerProperty::X, 100.0.into()),
            (LayerProperty::Opacity, 0.0.into()),
        ],
    );

    layer.on_change(LayerProperty::X, |event| {
        info!("x -> {:?}", event.value.as_number());
    });

    let events = Rc::new(RefCell::new(Vec::new()));
    let e = Rc::clone(&events);
    layer.on_animation_start(move |event| e.borrow_mut().push(("start", event.animation)));
    let e = Rc::clone(&events);
    layer.on_animation_stop(move |event| e.borrow_mut().push(("stop", event.animation)));
    let e = Rc::clone(&events);
    layer.on_animation_end(move |event| e.borrow_mut().push(("end", event.animation)));

    let curve = Curve::from_config(&config.animation);
    layer.animate(
        &[
            (LayerProperty::X, 300.0.into()),
            (LayerProperty::Opacity, 1.0.into()),
        ],
        curve,
    )?;

    let delta = 1.0 / 64.0;
    let frames = (curve.duration() / delta).ceil() as usize + 1;
    frame_loop.run(frames, delta);
    frame_loop.finish();

    info!("final state: x = {}, opacity = {}", layer.x(), layer.opacity());
    for (kind, animation) in events.borrow().iter() {
        info!("lifecycle: {} {:?}", kind, animation);
    }

    Ok(())
}
