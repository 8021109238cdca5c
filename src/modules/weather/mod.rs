pub mod forecast;
pub mod model;
