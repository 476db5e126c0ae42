// Small helpers shared by the editor, the renderer and the components.
use crate::geometry::DisplayRect;

pub fn clog(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        gloo::console::log!(msg);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = msg;
    }
}

pub fn cwarn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        gloo::console::warn!(msg);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = msg;
    }
}

/// `v` limited to `[lo, hi]`. Unlike `f64::clamp` this never panics when the
/// bounds cross; the lower bound wins.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(v))
}

/// Integer clamp used for label sizing.
pub fn clamp_i(v: i64, lo: i64, hi: i64) -> i64 {
    lo.max(hi.min(v))
}

/// Finite value or the fallback.
pub fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

/// Viewport rectangle of `el`.
pub fn client_rect(el: &web_sys::Element) -> DisplayRect {
    let r = el.get_bounding_client_rect();
    DisplayRect::new(r.left(), r.top(), r.width(), r.height())
}
