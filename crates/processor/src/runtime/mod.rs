//! Runtime module: process lifecycle: boot and command dispatch.

pub mod boot;
pub mod cli;
