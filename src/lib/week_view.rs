//! Role views over the weekly grid: fetch a page of sections from the
//! scheduling API, filter it, lay it out and publish the rendering.
pub mod fetch_guard;
pub mod helpers;
pub mod models;
pub mod publisher;
pub mod render;
pub mod run_tool;
pub mod schedule_getter;
