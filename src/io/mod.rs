mod printers;
mod readers;
mod webhook;
mod writers;

pub use printers::*;
pub use readers::*;
pub use webhook::*;
pub use writers::*;
