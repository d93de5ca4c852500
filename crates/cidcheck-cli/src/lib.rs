//! Library side of the `cidcheck` binary: logging setup, commands and
//! report rendering.

pub mod commands;
pub mod logging;
pub mod summary;
