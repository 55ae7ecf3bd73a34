pub mod capsules;
pub mod chain;
pub mod cli;
pub mod create;
pub mod mine;
pub mod status;
