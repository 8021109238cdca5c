pub mod controller;
pub mod model;
pub mod normalize;
pub mod stream;
