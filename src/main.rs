#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::{Cell, RefCell};
    use std::panic;
    use std::rc::Rc;

    use anyhow::{anyhow, Result};
    use cad_view::config::ViewerConfig;
    use cad_view::render::render::Renderer;
    use cad_view::render::viewer::{MousePressed, Viewer};
    use cad_view::{App, SCENE_CANVAS_ID};
    use leptos::logging::{error, log};
    use leptos::*;
    use wasm_bindgen::JsCast;
    use web_sys::HtmlCanvasElement;
    use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
    use winit::event_loop::{ControlFlow, EventLoop};
    use winit::platform::web::WindowBuilderExtWebSys;
    use winit::window::WindowBuilder;

    fn create_renderer(
        canvas: HtmlCanvasElement,
        render: Rc<RefCell<Option<Renderer>>>,
        pending: Rc<Cell<bool>>,
        width: u32,
        height: u32,
    ) {
        pending.set(true);
        spawn_local(async move {
            match Renderer::new(canvas, width, height).await {
                Ok(r) => {
                    render.borrow_mut().replace(r);
                }
                Err(e) => error!("create renderer failed by {:?}", e),
            }
            pending.set(false);
        });
    }

    pub fn run() -> Result<()> {
        panic::set_hook(Box::new(console_error_panic_hook::hook));

        let query = window().location().search().unwrap_or_default();
        let config = ViewerConfig::default().with_query(&query);
        let render: Rc<RefCell<Option<Renderer>>> = Default::default();
        let viewer = Rc::new(RefCell::new(Viewer::new(render.clone(), &config)));

        {
            let viewer = viewer.clone();
            mount_to_body(move || view! { <App viewer = viewer config = config /> });
            log!("mount");
        }

        let canvas = document()
            .get_element_by_id(SCENE_CANVAS_ID)
            .ok_or_else(|| anyhow!("missing #{} element", SCENE_CANVAS_ID))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| anyhow!("#{} is not a canvas", SCENE_CANVAS_ID))?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);
        let window = WindowBuilder::new()
            .with_canvas(Some(canvas.clone()))
            .build(&event_loop)?;
        window.request_redraw();

        let pending = Rc::new(Cell::new(false));
        event_loop.run(move |event, _| {
            let Event::WindowEvent { event, .. } = event else {
                return;
            };
            match event {
                WindowEvent::CursorMoved { position, .. } => {
                    viewer.borrow_mut().mouse_move(position);
                }

                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    viewer.borrow_mut().pressed_state = match state {
                        ElementState::Pressed => MousePressed::Left(None),
                        ElementState::Released => MousePressed::None,
                    };
                }

                WindowEvent::MouseWheel { delta, .. } => {
                    let delta_y = match delta {
                        MouseScrollDelta::PixelDelta(pos) => pos.y,
                        MouseScrollDelta::LineDelta(_, y) => y as f64,
                    };
                    viewer.borrow_mut().mouse_scroll(delta_y);
                }

                WindowEvent::RedrawRequested => {
                    if let Err(msg) = viewer.borrow_mut().render() {
                        error!("failed to render because {:?}", msg);
                    }
                    window.request_redraw();
                }

                WindowEvent::Resized(size) => {
                    let mut current = render.borrow_mut();
                    if let Some(current) = current.as_mut() {
                        current.resize(size.width, size.height);
                    } else if !pending.get() {
                        create_renderer(
                            canvas.clone(),
                            render.clone(),
                            pending.clone(),
                            size.width,
                            size.height,
                        );
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn main() -> anyhow::Result<()> {
    web::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    println!("cad-view runs in the browser; build it for wasm32-unknown-unknown with trunk");
}
