//! Various missing batteries for Rust

use std::{fmt, ops::Deref, str::FromStr};

/// Struct that runs the specified closure in its [`Drop`](Drop) impl
struct Guard<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> Drop for Guard<F> {
    fn drop(&mut self) {
        (self.0.take().unwrap())()
    }
}

/// Returns a struct which runs the specified closure in its [`Drop`](Drop) impl
pub fn on_drop<F: FnOnce()>(f: F) -> impl Drop {
    Guard(Some(f))
}

/// Returns a struct which prints execution time info in its [`Drop`](Drop) impl.
///  It logs the inital call as well.
pub fn debug_time_it(label: &'static str) -> impl Drop {
    let start = std::time::Instant::now();
    log::debug!("{}: started", label);
    on_drop(move || log::debug!("{}: {:?}", label, start.elapsed()))
}

/// String that is guaranteed to contain at least one non-whitespace character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonHollowString(String);

impl FromStr for NonHollowString {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Err("expected a non-blank string".to_owned());
        }
        Ok(Self(input.to_owned()))
    }
}

impl Deref for NonHollowString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonHollowString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
