pub mod calls;
pub mod dab;
pub mod session;

pub use calls::{BallRng, JsRandom};
pub use session::{ActiveView, CelebrationLatch, GameMode, Session, SessionAction};
