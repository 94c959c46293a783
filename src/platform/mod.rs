//! Platform layer
//!
//! Engine-side implementations of `SceneHost`. Only the headless recorder
//! lives in this crate; real engines implement the trait in their own crates.

pub mod headless;

pub use headless::{HeadlessHost, HostCommand};
