//! # LLM Console
//!
//! A terminal console for experimenting with and evaluating multiple LLM
//! providers against a governance backend reached over HTTP.
//!
//! ## Overview
//!
//! This library talks to the backend's JSON API and reshapes what comes back
//! for terminal output (text or JSON):
//! - Playground chat requests with per-call cost/latency/token metrics
//! - Analytics summaries grouped by provider, use case, and model
//! - Evaluation runs rendered as a prompt x model comparison matrix
//! - Manual and AI-judge scoring, with persisted evaluation history
//!
//! All routing, cost calculation, and persistence live in the backend; this
//! crate is presentation only.
//!
//! ## Features
//!
//! - `colors` (default): Enables terminal color output via owo-colors

/// Grouped summaries of request and evaluation telemetry
pub mod aggregate;

/// Backend HTTP client
pub mod api;

/// Static model catalog and lookup helpers
pub mod catalog;

/// Command-line argument parsing and configuration
pub mod cli;

/// Display formatting for text and JSON output
pub mod display;

/// Prompt x model comparison matrix for evaluation runs
pub mod matrix;

/// Data models for records, evaluations, and chat outcomes
pub mod models;

/// Utility functions for formatting and terminal layout
pub mod utils;
