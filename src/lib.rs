//! sereno: assistive social-communication client.
//!
//! Loads pre-written social prompts from the Sereno backend (falling back to
//! a built-in emergency list), and exposes copy/speak actions, chat, a
//! simulated sound-level meter and a noise generator.

pub mod api;
pub mod chat;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod mic;
pub mod noise;
pub mod prompts;
pub mod speech;
