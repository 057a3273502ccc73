//! State management for crawl sessions
//!
//! This module provides the crawl session state machine.

mod crawl_state;

pub use crawl_state::CrawlState;
