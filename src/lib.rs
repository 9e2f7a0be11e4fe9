#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod atlas;
mod background;
mod canvas2d;
mod constants;
mod cursor;
mod dom;
mod events;
mod frame;
mod input;
mod keyboard3d;
mod lifecycle;
mod listener;
mod render;
mod snow;

use background::BackgroundMount;
use constants::{
    CURSOR_DOT_ID, CURSOR_FOLLOWER_ID, KEYBOARD_CANVAS_ID, PARTICLE_CANVAS_ID, SNOW_CANVAS_ID,
};
use cursor::CursorMount;
use keyboard3d::KeyboardMount;
use lifecycle::MountGeneration;
use snow::SnowMount;

/// Every visual component currently on the page. A component whose element
/// is missing, or whose context could not be acquired, stays `None`.
#[derive(Default)]
struct App {
    background: Option<BackgroundMount>,
    snow: Option<SnowMount>,
    cursor: Option<CursorMount>,
    keyboard: Option<KeyboardMount>,
}

thread_local! {
    static APP: RefCell<App> = RefCell::new(App::default());
    static GENERATION: MountGeneration = MountGeneration::default();
}

fn mount_component<T>(name: &str, mount: impl FnOnce() -> anyhow::Result<T>) -> Option<T> {
    match mount() {
        Ok(component) => Some(component),
        Err(e) => {
            log::error!("{name} not mounted: {e:?}");
            None
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("folio-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let ticket = GENERATION.with(|g| g.ticket());

    let background = mount_component("particle background", || {
        BackgroundMount::mount(dom::element_by_id::<web::HtmlCanvasElement>(
            &document,
            PARTICLE_CANVAS_ID,
        )?)
    });
    let snow = mount_component("snow", || {
        SnowMount::mount(dom::element_by_id::<web::HtmlCanvasElement>(
            &document,
            SNOW_CANVAS_ID,
        )?)
    });
    let cursor = mount_component("cursor", || {
        CursorMount::mount(
            dom::element_by_id::<web::HtmlElement>(&document, CURSOR_DOT_ID)?,
            dom::element_by_id::<web::HtmlElement>(&document, CURSOR_FOLLOWER_ID)?,
        )
    });
    APP.with(|app| {
        let mut app = app.borrow_mut();
        app.background = background;
        app.snow = snow;
        app.cursor = cursor;
    });

    // WebGPU setup is async; the 2D layers are already running meanwhile
    let keyboard = match dom::element_by_id::<web::HtmlCanvasElement>(&document, KEYBOARD_CANVAS_ID) {
        Ok(canvas) => match KeyboardMount::mount(canvas).await {
            Ok(k) => Some(k),
            Err(e) => {
                log::error!("skills keyboard not mounted: {e:?}");
                None
            }
        },
        Err(e) => {
            log::info!("skills keyboard skipped: {e}");
            None
        }
    };
    let Some(keyboard) = keyboard else {
        return Ok(());
    };
    // unmount() may have run while the GPU was being set up
    match GENERATION.with(|g| g.admit(ticket, keyboard)) {
        Some(k) => APP.with(|app| app.borrow_mut().keyboard = Some(k)),
        None => log::info!("skills keyboard resolved after unmount; dropped"),
    }
    Ok(())
}

/// Tears down every mounted component: frame loops are cancelled and all
/// listeners removed.
#[wasm_bindgen]
pub fn unmount() {
    GENERATION.with(|g| g.advance());
    let app = APP.with(|app| std::mem::take(&mut *app.borrow_mut()));
    drop(app);
}
