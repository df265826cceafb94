//! # S-Play Control Library
//!
//! `splay-control-lib` is a Rust library for remotely controlling S-Play DMX lighting
//! playback devices. It wraps the device's HTTP command API: playlists, cues, DMX
//! recording, triggers, events, settings and system information.
//!
//! Every command needs a session token. The library obtains one by opening a
//! WebSocket to the device and reading the FlatBuffers message the device pushes
//! on connect, then posts the command as JSON with the token attached.
//!
//! ## Features
//!
//! - One async method per device command on [`ControlInterface`]
//! - Typed requests and responses for the whole command catalog
//! - Separate timeouts for the handshake and for each request
//! - A distinct error for every way a call can fail
//!
//! ## Example
//!
//! Start a playlist and read back the master fader:
//!
//! ```no_run
//! use splay_control_lib::ControlInterface;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let control = ControlInterface::new("192.168.1.60");
//!
//!     control.play(1).await?;
//!     let master = control.get_master_intensity().await?;
//!     println!("Master intensity: {}", master.intensity);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Disclaimer
//!
//! This project is not affiliated with, authorized by, endorsed by, or in any way officially connected
//! with the manufacturer of S-Play devices or its affiliates.
//!
//! ## License
//!
//! This project is dual-licensed under the MIT License and the Apache License, Version 2.0.
//! You may choose to use either license, depending on your project needs.
//! See the `LICENSE-MIT` and `LICENSE-APACHE` files for the full text of the licenses.

// The `util` module holds the protocol plumbing: the handshake envelope codec,
// token acquisition, command dispatch, configuration and the error type.
//
// Example usage:
//
// ```
// use splay_control_lib::util::config::ClientConfig;
// use std::time::Duration;
//
// let config = ClientConfig::new("192.168.1.60").with_timeout(Duration::from_secs(5));
// assert_eq!(config.api_url(), "http://192.168.1.60:55555/api");
// ```
pub mod util;

// The `control_interface` module provides the device client, the command
// catalog and the records the device sends and accepts.
//
// Example usage:
//
// ```
// use splay_control_lib::control_interface::ControlInterface;
//
// #[tokio::main]
// async fn main() {
//     let control = ControlInterface::new("192.168.1.60");
//     let version = control.get_version().await.unwrap();
//     println!("{}", version.version);
// }
// ```
pub mod control_interface;

pub use control_interface::ControlInterface;
pub use util::config::ClientConfig;
pub use util::error::{Error, Phase, Result};
