// src/macros.rs

/// `String` shorthand: `s!()` is empty, `s!(x)` is `String::from(x)`.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    // literals, consts, &str vars, char
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}
