pub mod grid;
pub mod week_view;
