pub mod facts;
pub mod init_config;
pub mod report;
pub mod tax;
