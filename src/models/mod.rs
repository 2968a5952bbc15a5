pub mod action;
pub mod event;
pub mod message;
pub mod tool;

pub use action::Action;
pub use event::{ArcEventTx, Event, EventTx};
pub use message::{Message, Role};
pub use tool::*;
