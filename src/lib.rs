//! Keyboard-aware viewport coordination.
//!
//! Tracks mobile viewport geometry, on-screen keyboard visibility, safe-area
//! insets, and orientation; keeps a bound text element's focus state in sync;
//! and computes keyboard-safe container styles published as CSS custom
//! properties.
//!
//! Pure core / impure shell:
//! - reducers: [`viewport`], [`safe_area`], [`focus`], [`layout`], [`perf`]
//! - ports: [`source`] (host in), [`publish`] (properties out)
//! - wiring: [`integration`], [`replay`]
//! - shell: [`config`], [`logging`], [`model::error`], and the wasm32-only
//!   `web` entry point

pub mod config;
pub mod focus;
pub mod integration;
pub mod layout;
pub mod logging;
pub mod model;
pub mod perf;
pub mod publish;
pub mod replay;
pub mod safe_area;
pub mod source;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use integration::KeyboardLayoutSession;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
