use std::path::Path;

use anyhow::{Context, Result};
use winit::{
    dpi::PhysicalSize,
    event::Event,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, WindowBuilder},
};

use crate::{settings::Settings, Engine};

pub fn run(settings_path: impl AsRef<Path>) -> Result<()> {
    env_logger::init();

    let settings = Settings::load_or_default(settings_path)?;
    log::info!(
        "sampler: {:?} filtering, vertical flip {}",
        settings.sampler.filter,
        settings.sampler.flip_vertical
    );

    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let (width, height) = settings.graphics.resolution;
    let window = WindowBuilder::new()
        .with_title("atlascraft")
        .with_inner_size(PhysicalSize::new(width as u32, height as u32))
        .with_fullscreen(settings.graphics.fullscreen.then_some(Fullscreen::Borderless(None)))
        .build(&event_loop)
        .context("creating window")?;

    let mut engine = Engine::new(&window, &settings)?;

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                window_id,
                event
            }
            if window_id == engine.window.id() => {
                engine.handle_window_event(event, elwt)
            }
            Event::AboutToWait => {
                // RedrawRequested will only trigger once, unless we manually
                // request it.
                engine.window.request_redraw();
            }
            _ => ()
        }
    })?;

    Ok(())
}
