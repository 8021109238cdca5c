pub mod chat;
pub mod location;
pub mod schemes;
pub mod weather;
