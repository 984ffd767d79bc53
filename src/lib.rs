pub mod candidate;
pub mod config;
pub mod finder;
pub mod geo;
pub mod http;
pub mod locate;
pub mod logging;
pub mod nearest;
pub mod report;
pub mod source;
