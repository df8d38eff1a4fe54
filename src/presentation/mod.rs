pub mod app;
pub mod components;
pub mod drive_pad;
pub mod radar_view;
pub mod tabs;
pub mod theme;
