mod key;
mod refresh;

pub use key::*;
pub use refresh::*;
