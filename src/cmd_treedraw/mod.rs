pub mod to_dot;
pub mod to_tex;
pub mod utils;
