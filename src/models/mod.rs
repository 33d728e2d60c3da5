pub mod artifact;
pub mod request;
pub mod result;
pub mod stage;

pub use artifact::*;
pub use request::*;
pub use result::*;
pub use stage::*;
