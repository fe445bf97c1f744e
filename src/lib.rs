// Library for tests to access modules

pub mod config;
pub mod expansion;
pub mod fetcher;
pub mod merge;
pub mod models;
pub mod render;
pub mod scheduler;
pub mod smoother;
pub mod view;
pub mod version;
