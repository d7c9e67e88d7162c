//! hidden arrange macros

/// Declare unit error types with a fixed message.
///
/// Each type gets a `MESSAGE` constant, `new`, `Display` and `Error`.
#[doc(hidden)]
#[macro_export]
macro_rules! __static_str_error {
    ($(
        $(#[$m:meta])*
        $vis:vis struct $name:ident = $message:literal;
    )+) => {$(
        $(#[$m])*
        #[doc = ""]
        #[doc = concat!("Displayed as `", $message, "`.")]
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        #[non_exhaustive]
        $vis struct $name;

        impl $name {
            /// The message this error is displayed as.
            $vis const MESSAGE: &'static str = $message;

            #[doc = concat!("Create a new [`", stringify!($name), "`].")]
            #[must_use]
            $vis const fn new() -> Self {
                Self
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(Self::MESSAGE)
            }
        }

        impl ::std::error::Error for $name {}
    )+};
}
#[doc(inline)]
pub use crate::__static_str_error as static_str_error;
