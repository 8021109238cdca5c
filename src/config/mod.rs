pub mod endpoints;

pub use endpoints::{BecknIdentity, ConfigError, EndpointConfig};
