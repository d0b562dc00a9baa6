pub mod config;
pub mod logging;

pub mod archive;
pub mod archiver;
pub mod feeds;
pub mod fetch;
pub mod opml;
pub mod storage;
