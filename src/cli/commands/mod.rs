pub mod extract;
pub mod helper;
pub mod init;
pub mod plugins;
mod command_result;

pub use command_result::*;
