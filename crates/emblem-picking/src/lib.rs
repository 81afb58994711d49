pub mod picker;
pub mod ray;

pub use picker::{SurfaceHit, SurfacePicker};
pub use ray::Ray;
