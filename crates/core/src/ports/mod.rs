mod source;
mod translator;

pub use source::*;
pub use translator::*;
