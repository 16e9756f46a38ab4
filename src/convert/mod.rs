pub mod archive;
pub mod config;
pub mod model;
pub mod paths;
pub mod skeleton;
pub mod to_daylio;
pub mod to_pixels;
pub mod util;
