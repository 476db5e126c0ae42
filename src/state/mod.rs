pub mod designer;
pub mod dividers;
pub mod drag;
pub mod preview;
pub mod rect_editor;

pub use designer::Designer;
pub use drag::{capture_pointer, GestureSlot, PointerSubscription, SharedSlot};
pub use preview::{PreviewResize, PreviewSize};
