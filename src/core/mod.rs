//! Core modules: catalog sources and store, media boundary, playback controller

pub mod catalog;
pub mod media;
pub mod player;
pub mod source;
