//! Interactive bounding-box editing: pointer input, the gesture state
//! machine, scoped listener registration, and the scratch/store sync.

pub mod editor;
pub mod gesture;
pub mod input;
pub mod listener;
pub mod sync;

pub use editor::Editor;
pub use gesture::{GestureController, GestureOutcome, GestureState};
pub use input::PointerEvent;
pub use listener::{CountingHost, ListenerHost};
pub use sync::{ScratchCell, SyncEngine};
