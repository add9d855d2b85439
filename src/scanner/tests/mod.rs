//! Scanner scenario tests against a mock hosting API

mod helpers;
