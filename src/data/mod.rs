pub mod buffer;
pub mod options;
pub mod samples;
pub mod surface;
pub mod target;
pub mod template;
