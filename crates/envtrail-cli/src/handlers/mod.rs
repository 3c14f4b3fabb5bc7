pub mod init;
pub mod log;
pub mod mcp;
pub mod resolve;
pub mod rotate;
pub mod status;
pub mod weeks;
