mod glyphs;
pub mod matcher;
pub mod sampler;
