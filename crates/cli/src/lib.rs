//! Cube CLI library: command implementations shared by the `cube` binary

pub mod commands;
