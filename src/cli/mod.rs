//! Workflow orchestration behind the command-line entry point

pub mod orchestration;
