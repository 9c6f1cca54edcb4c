// ABOUTME: Terminal user interface for the interactive host picker
// ABOUTME: Raw-mode crossterm loop around a pure ratatui rendering of the selector

pub mod picker;

pub use picker::pick_host;
