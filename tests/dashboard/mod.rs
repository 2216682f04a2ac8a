//! Dashboard integration tests.

pub mod common;
pub mod headless_test;
pub mod render_pass_test;
