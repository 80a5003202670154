pub mod csrf;
pub mod logging;
pub mod rate_limit;
pub mod tenant;

// vim: ts=4
