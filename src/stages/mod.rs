pub mod runner;
pub mod stage1_structure;
pub mod stage2_write;
pub mod stage3_review;

pub use runner::*;
pub use stage1_structure::*;
pub use stage2_write::*;
pub use stage3_review::*;
