pub mod compositor;
pub mod cpu;
pub mod pipeline;
