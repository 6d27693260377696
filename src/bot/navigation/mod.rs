//! Menu navigation: button actions, screens, rendering and the transition logic
//! that ties them to progress state.

pub mod action;
pub mod navigator;
pub mod screen;
pub mod view;

pub use action::{Action, ActionTag, ParseActionError};
pub use navigator::{NavigationError, Navigator, Notice, Outcome, Transition};
pub use screen::{is_allowed, Screen, ScreenKind};
pub use view::View;
