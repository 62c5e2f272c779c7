//! UI layer for the desktop publisher: sign-in, upload form, landing view and alerts.

pub mod app;

pub use app::{PublisherApp, StartupConfig};
