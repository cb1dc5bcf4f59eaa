pub mod pipeline;
pub mod speech;
pub mod video;
