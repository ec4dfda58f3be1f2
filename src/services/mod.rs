pub mod archiver;
pub mod processor;
