//! plex-clearlogo: find clear logo images next to your media and upload them
//! to a Plex server.
//!
//! The engine maps each item's server-side path to a local folder through a
//! user-maintained table (`mapping`, `resolver`), looks for `logo`/`clearlogo`
//! images there (`prober`), and uploads what it finds (`processor`). The
//! `session` module drives it over whole libraries or interactive searches.

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod logo_url;
pub mod mapping;
pub mod model;
pub mod plex;
pub mod prober;
pub mod processor;
pub mod resolver;
pub mod session;
pub mod transfer;
pub mod tui;
