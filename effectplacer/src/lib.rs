// Sprite effect placement: projection, point model and engine definition export
pub mod placement;
pub mod point;
pub mod projection;
pub mod types;
pub mod xml;
