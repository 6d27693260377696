pub mod commands;
pub mod handlers;
pub mod navigation;
pub mod session;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;
