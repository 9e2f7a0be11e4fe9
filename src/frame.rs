use folio_core::FrameScheduler;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Cancelable requestAnimationFrame driver.
///
/// Each [`request`](Self::request) schedules one call of the bound tick; the
/// tick asks again if it wants another frame. Dropping the loop cancels the
/// pending frame and releases the closure.
pub struct FrameLoop {
    callback: Callback,
    handle: Option<i32>,
}

impl FrameLoop {
    /// A loop with nothing bound yet; requests are ignored until [`bind`](Self::bind).
    pub fn detached() -> Self {
        Self {
            callback: Rc::new(RefCell::new(None)),
            handle: None,
        }
    }

    pub fn bind(&mut self, tick: impl FnMut() + 'static) {
        *self.callback.borrow_mut() = Some(Closure::wrap(Box::new(tick) as Box<dyn FnMut()>));
    }

    pub fn request(&mut self) {
        let Some(window) = web::window() else {
            return;
        };
        let callback = self.callback.borrow();
        let Some(tick) = callback.as_ref() else {
            return;
        };
        match window.request_animation_frame(tick.as_ref().unchecked_ref()) {
            Ok(id) => self.handle = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Some(window) = web::window() {
                _ = window.cancel_animation_frame(id);
            }
        }
    }
}

impl FrameScheduler for FrameLoop {
    fn request_frame(&mut self) {
        self.request();
    }

    fn cancel(&mut self) {
        FrameLoop::cancel(self);
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
        // drop the closure outside of any borrow it may hold of its owner
        if let Ok(mut cb) = self.callback.try_borrow_mut() {
            cb.take();
        }
    }
}
