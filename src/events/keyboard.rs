use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

use crate::keyboard3d::KeyboardView;
use crate::listener::EventListener;

/// True for keys held together with a shortcut modifier; those belong to
/// the browser, not the keycaps.
#[inline]
fn is_shortcut(ev: &web::KeyboardEvent) -> bool {
    ev.ctrl_key() || ev.meta_key() || ev.alt_key()
}

/// Routes window key-down/key-up to the keycaps. A key press only moves the
/// keycap bound to that trigger; releasing it lets the keycap settle.
pub(crate) fn wire_key_handlers(
    window: &web::Window,
    view: &Rc<RefCell<KeyboardView>>,
) -> anyhow::Result<Vec<EventListener>> {
    let weak = Rc::downgrade(view);
    let down = EventListener::typed::<web::KeyboardEvent>(window, "keydown", move |ev| {
        if is_shortcut(&ev) {
            return;
        }
        if let Some(view) = weak.upgrade() {
            let mut v = view.borrow_mut();
            if v.keyboard.key_down(&ev.key()) {
                v.refresh_cursor();
            }
        }
    })?;

    // releases are never filtered, so a key let go after its modifier still settles
    let weak = Rc::downgrade(view);
    let up = EventListener::typed::<web::KeyboardEvent>(window, "keyup", move |ev| {
        if let Some(view) = weak.upgrade() {
            let mut v = view.borrow_mut();
            if v.keyboard.key_up(&ev.key()) {
                v.refresh_cursor();
            }
        }
    })?;
    Ok(vec![down, up])
}
