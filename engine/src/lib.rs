//! Desktop host layer for the virtual piano: a software-rendered window, an event source with
//! scoped subscriptions, and sample playback.

pub mod app;
pub mod audio;
pub mod events;
pub mod graphics;
pub mod pixels_renderer;
pub mod regression;
pub mod surface;
pub mod ui;
