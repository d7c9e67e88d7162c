//! compile-time assertions used by the tests of the arrange crates

/// Asserts at compile time that `T` is [`Send`].
pub fn assert_send<T: Send>() {}

/// Asserts at compile time that `T` is [`Sync`].
pub fn assert_sync<T: Sync>() {}
