// Domain-driven module structure for the munki report processor.

// Core infrastructure
pub mod parser;
pub mod filter;
pub mod client;

// Domain modules
pub mod report;
pub mod service;
pub mod conf;
pub mod runtime;
