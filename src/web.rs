#![cfg(target_arch = "wasm32")]

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlCanvasElement, Performance};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::web::{EventLoopExtWebSys, WindowBuilderExtWebSys};
use winit::window::WindowBuilder;

use crate::app::{App, Overlay};
use crate::config::SceneConfig;
use crate::demo::CubeScene;
use crate::render::GpuContext;

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
    let _ = wasm_logger::init(wasm_logger::Config::default());
}

/// Starts the cube demo on the canvas with the given element id. The frame
/// rate is written to the element named by the scene config (`#fpsLabel`).
#[wasm_bindgen]
pub fn start_demo(canvas_id: String) {
    spawn_local(async move {
        if let Err(err) = run_demo(&canvas_id).await {
            log::error!("demo error: {err:?}");
        }
    });
}

async fn run_demo(canvas_id: &str) -> Result<()> {
    let browser = web_sys::window().ok_or_else(|| anyhow!("window not available"))?;
    let document = browser
        .document()
        .ok_or_else(|| anyhow!("document not available"))?;
    let performance = browser
        .performance()
        .ok_or_else(|| anyhow!("performance timer not available"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| anyhow!("canvas #{canvas_id} not found"))?
        .dyn_into()
        .map_err(|_| anyhow!("#{canvas_id} is not a canvas"))?;

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("MiniRAID")
            .with_canvas(Some(canvas))
            .build(&event_loop)
            .map_err(|err| anyhow!("failed to create window: {err}"))?,
    );

    let mut gfx = GpuContext::new(Arc::clone(&window))
        .await
        .context("failed to initialize WebGL context")?;
    let mut app = App::new(CubeScene::new(SceneConfig::default()));
    app.start(&mut gfx, now_secs(&performance))?;

    let mut overlay = DomOverlay { document };

    event_loop.spawn(move |event, _target, control_flow| {
        *control_flow = ControlFlow::Poll;
        match event {
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                window_id,
            } if window_id == gfx.window_id() => gfx.resize(size),
            Event::RedrawRequested(window_id) if window_id == gfx.window_id() => {
                if let Err(err) = app.frame(now_secs(&performance), &mut gfx, &mut overlay) {
                    log::error!("frame error: {err:?}");
                    control_flow.set_exit();
                }
            }
            Event::MainEventsCleared => gfx.window().request_redraw(),
            _ => {}
        }
    });

    Ok(())
}

fn now_secs(performance: &Performance) -> f64 {
    performance.now() / 1000.0
}

/// Writes labels into the `innerHTML` of the element with the label's id.
struct DomOverlay {
    document: Document,
}

impl Overlay for DomOverlay {
    fn set_label(&mut self, id: &str, text: &str) -> Result<()> {
        let element = self
            .document
            .get_element_by_id(id)
            .ok_or_else(|| anyhow!("label element #{id} not found"))?;
        element.set_inner_html(text);
        Ok(())
    }
}
