pub mod builtins;
pub mod error_reporter;
pub mod io;
pub mod position;
