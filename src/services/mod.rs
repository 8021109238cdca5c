pub mod beckn;
pub mod chat;
pub mod location;
pub mod schemes;
pub mod transcribe;
pub mod weather;
