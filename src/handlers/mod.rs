pub mod archive;
pub mod process;
pub mod ui;
