pub mod interview;
pub mod pipeline;
pub mod role;
