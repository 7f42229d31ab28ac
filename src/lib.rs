pub mod launcher;
pub mod render;
pub mod scene;
pub mod settings;


use anyhow::Result;
use scene::Scene;
use settings::Settings;

use render::renderer::Renderer;
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::EventLoopWindowTarget,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};


pub struct Engine<'a> {
    pub window: &'a Window,
    renderer: Renderer<'a>,
    scene: Scene,
}

impl<'a> Engine<'a> {
    pub fn new(window: &'a Window, settings: &Settings) -> Result<Self> {
        let renderer = Renderer::new(window)?;
        let scene = Scene::new(&renderer, settings)?;

        Ok(Self {
            window,
            renderer,
            scene,
        })
    }

    pub fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<()>) {
        match event {
            WindowEvent::CloseRequested => elwt.exit(),

            WindowEvent::Resized(physical_size) => self.resize(physical_size),

            WindowEvent::RedrawRequested => {
                match self.renderer.render(&self.scene, &self.scene.globals_bind_group) {
                    Ok(_) => {}
                    // Reconfigure the surface if lost
                    Err(wgpu::SurfaceError::Lost) => self.resize(self.renderer.size),
                    // The system is out of memory, we should probably quit
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory, exiting");
                        elwt.exit()
                    }
                    // All other errors (Outdated, Timeout) should be resolved by the next frame
                    Err(e) => log::warn!("{e:?}"),
                }
            }

            // F toggles the vertical flip, to compare both image-origin conventions
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::KeyF),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
                ..
            } => self.scene.toggle_flip(&self.renderer),

            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                },
                ..
            } => elwt.exit(),

            _ => {}
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize(new_size);
    }
}
