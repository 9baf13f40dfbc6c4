/// Unit test binary
///
/// Exercises the tool invocation framework and session bookkeeping through
/// the public library API.
mod invocation_tests;
mod session_tests;
