//! Tests for the HTTP RPC binding.

mod server_tests;
