pub mod classifier;
pub mod device;
pub mod event;
pub mod geometry;
pub mod manager;
pub mod output;
pub mod region;
pub mod sample;
pub mod service;
pub mod source;
pub mod tracker;
