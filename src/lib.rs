pub mod config;
pub mod entities;
pub mod errors;
pub mod filters;
pub mod http;
pub mod io;
pub mod probes;
pub mod scan;
