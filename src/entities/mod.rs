mod domain;
mod results;

pub use domain::*;
pub use results::*;
