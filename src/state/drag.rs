// Exclusive pointer capture for one drag gesture at a time.
//
// A gesture owns its window-level move/up listeners. Beginning a gesture
// drops (and so unregisters) any previous one; ending it, cancelling it or
// dropping the slot releases exactly the listeners that gesture added.
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
pub struct GestureSlot<S> {
    active: Option<S>,
    generation: u64,
}

impl<S> Default for GestureSlot<S> {
    fn default() -> Self {
        Self {
            active: None,
            generation: 0,
        }
    }
}

impl<S> GestureSlot<S> {
    /// Installs `subscription`, releasing any gesture still held. Returns the
    /// new gesture's generation.
    pub fn begin(&mut self, subscription: S) -> u64 {
        self.active = Some(subscription);
        self.generation += 1;
        self.generation
    }

    /// Releases the active gesture. Returns false if none was held.
    pub fn end(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Releases the gesture only if it is still generation `generation`.
    pub fn end_generation(&mut self, generation: u64) -> bool {
        if self.generation == generation {
            self.end()
        } else {
            false
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

pub type PointerSubscription = (gloo::events::EventListener, gloo::events::EventListener);

/// Slot shared between a component and the listeners it installs, so the
/// "up" listener can end its own gesture.
pub type SharedSlot<S> = Rc<RefCell<GestureSlot<S>>>;

/// Registers window `mousemove`/`mouseup` listeners for one gesture. The up
/// listener runs `on_up` and then releases both listeners.
pub fn capture_pointer<M, U>(slot: &SharedSlot<PointerSubscription>, mut on_move: M, mut on_up: U)
where
    M: FnMut(&web_sys::MouseEvent) + 'static,
    U: FnMut() + 'static,
{
    use gloo::events::EventListener;
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };
    let move_listener = EventListener::new(&window, "mousemove", move |e| {
        if let Some(me) = e.dyn_ref::<web_sys::MouseEvent>() {
            on_move(me);
        }
    });
    let slot_for_up = slot.clone();
    let generation = slot.borrow().generation() + 1;
    let up_listener = EventListener::new(&window, "mouseup", move |_| {
        on_up();
        // Deferred so the listener is not dropped while it is running.
        let slot = slot_for_up.clone();
        gloo::timers::callback::Timeout::new(0, move || {
            slot.borrow_mut().end_generation(generation);
        })
        .forget();
    });
    slot.borrow_mut().begin((move_listener, up_listener));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Tracked(Rc<Cell<i32>>);

    impl Tracked {
        fn new(live: &Rc<Cell<i32>>) -> Self {
            live.set(live.get() + 1);
            Tracked(live.clone())
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    #[test]
    fn restarting_a_gesture_never_leaks() {
        let live = Rc::new(Cell::new(0));
        let mut slot = GestureSlot::default();
        slot.begin(Tracked::new(&live));
        slot.begin(Tracked::new(&live));
        slot.begin(Tracked::new(&live));
        assert_eq!(live.get(), 1);
        assert!(slot.end());
        assert_eq!(live.get(), 0);
        assert!(!slot.end());
    }

    #[test]
    fn stale_end_leaves_newer_gesture_alone() {
        let live = Rc::new(Cell::new(0));
        let mut slot = GestureSlot::default();
        let first = slot.begin(Tracked::new(&live));
        let second = slot.begin(Tracked::new(&live));
        assert!(!slot.end_generation(first));
        assert_eq!(live.get(), 1);
        assert!(slot.end_generation(second));
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn dropping_the_slot_releases() {
        let live = Rc::new(Cell::new(0));
        {
            let mut slot = GestureSlot::default();
            slot.begin(Tracked::new(&live));
            assert!(slot.is_active());
        }
        assert_eq!(live.get(), 0);
    }
}
