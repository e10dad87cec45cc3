//! Page scroll lock held while an overlay is open.

/// Something whose CSS `overflow` can be set.
pub trait Overflow {
    fn set_overflow(&self, value: &str);
}

/// The document body.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyOverflow;

impl Overflow for BodyOverflow {
    fn set_overflow(&self, value: &str) {
        let Some(body) = gloo_utils::document().body() else {
            log::warn!("No document body to lock scrolling on");
            return;
        };
        if let Err(e) = body.style().set_property("overflow", value) {
            log::warn!("Could not set body overflow: {:?}", e);
        }
    }
}

/// Sets `overflow: hidden` on acquire and `overflow: unset` on drop.
#[derive(Debug)]
pub struct ScrollLock<O: Overflow = BodyOverflow> {
    target: O,
}

impl<O: Overflow> ScrollLock<O> {
    pub fn acquire(target: O) -> Self {
        target.set_overflow("hidden");
        Self { target }
    }
}

impl<O: Overflow> Drop for ScrollLock<O> {
    fn drop(&mut self) {
        self.target.set_overflow("unset");
    }
}
