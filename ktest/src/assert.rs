//! Assertion and failure reporting
//!
//! Every macro here funnels into [`fail_unless`]: evaluate a condition,
//! and on failure format the diagnostic, attach file/line provenance,
//! bump the invocation's failure counter, and hand the message to the
//! result transport. Failures are recorded, never thrown — a failed
//! assertion does not stop sibling iterations or other tests.
//!
//! Control flow after recording is the caller's choice. Each macro is an
//! expression yielding the condition's truth, so a body can ignore it
//! (plain form), use a `_ret` variant to return early, or inspect the
//! result and `break` out of a labeled cleanup block:
//!
//! ```ignore
//! 'cleanup: {
//!     if !ktest_assert_eq!(chan, got, want) {
//!         break 'cleanup;
//!     }
//!     // ... more checks against the same resource ...
//! }
//! release(resource);
//! ```

use core::fmt;

use crate::report::RunChannel;

/// Record a failure in the channel unless `ok` holds
///
/// Returns `ok` so callers can steer control flow on the outcome. On
/// success there is no side effect.
pub fn fail_unless(
    chan: &mut RunChannel<'_>,
    ok: bool,
    file: &'static str,
    line: u32,
    args: fmt::Arguments<'_>,
) -> bool {
    if !ok {
        chan.record_failure(file, line, alloc::fmt::format(args));
    }
    ok
}

/// Fail the invocation unless the condition is true
#[macro_export]
macro_rules! ktest_assert {
    ($chan:expr, $cond:expr) => {
        $crate::assert::fail_unless(
            $chan,
            $cond,
            file!(),
            line!(),
            format_args!("Failure '{}' occurred", stringify!($cond)),
        )
    };
}

/// Fail the invocation with a formatted message unless the condition is true
#[macro_export]
macro_rules! ktest_assert_msg {
    ($chan:expr, $cond:expr, $($arg:tt)+) => {
        $crate::assert::fail_unless($chan, $cond, file!(), line!(), format_args!($($arg)+))
    };
}

/// Fail the invocation unless the condition is true; return on failure
#[macro_export]
macro_rules! ktest_assert_ret {
    ($chan:expr, $cond:expr) => {
        if !$crate::ktest_assert!($chan, $cond) {
            return;
        }
    };
}

/// Always fail
#[macro_export]
macro_rules! ktest_fail {
    ($chan:expr) => {
        $crate::assert::fail_unless($chan, false, file!(), line!(), format_args!("Failed"))
    };
    ($chan:expr, $($arg:tt)+) => {
        $crate::assert::fail_unless($chan, false, file!(), line!(), format_args!($($arg)+))
    };
}

// Integer comparisons with improved output: the diagnostic embeds both
// operand expressions and both evaluated values in hexadecimal.
#[doc(hidden)]
#[macro_export]
macro_rules! __ktest_assert_cmp {
    ($chan:expr, $x:expr, $op:tt, $y:expr) => {{
        let x = $x;
        let y = $y;
        $crate::assert::fail_unless(
            $chan,
            x $op y,
            file!(),
            line!(),
            format_args!(
                "Assertion '{}{}{}' failed: {}=={:#x}, {}=={:#x}",
                stringify!($x),
                stringify!($op),
                stringify!($y),
                stringify!($x),
                x,
                stringify!($y),
                y
            ),
        )
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ktest_assert_cmp_ret {
    ($chan:expr, $x:expr, $op:tt, $y:expr) => {
        if !$crate::__ktest_assert_cmp!($chan, $x, $op, $y) {
            return;
        }
    };
}

/// Fail unless `x == y` (integer operands, hex-formatted diagnostic)
#[macro_export]
macro_rules! ktest_assert_eq {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp!($chan, $x, ==, $y)
    };
}

/// Fail unless `x != y`
#[macro_export]
macro_rules! ktest_assert_ne {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp!($chan, $x, !=, $y)
    };
}

/// Fail unless `x < y`
#[macro_export]
macro_rules! ktest_assert_lt {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp!($chan, $x, <, $y)
    };
}

/// Fail unless `x <= y`
#[macro_export]
macro_rules! ktest_assert_le {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp!($chan, $x, <=, $y)
    };
}

/// Fail unless `x > y`
#[macro_export]
macro_rules! ktest_assert_gt {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp!($chan, $x, >, $y)
    };
}

/// Fail unless `x >= y`
#[macro_export]
macro_rules! ktest_assert_ge {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp!($chan, $x, >=, $y)
    };
}

/// [`ktest_assert_eq!`] returning from the enclosing body on failure
#[macro_export]
macro_rules! ktest_assert_eq_ret {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp_ret!($chan, $x, ==, $y)
    };
}

/// [`ktest_assert_ne!`] returning from the enclosing body on failure
#[macro_export]
macro_rules! ktest_assert_ne_ret {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp_ret!($chan, $x, !=, $y)
    };
}

/// [`ktest_assert_lt!`] returning from the enclosing body on failure
#[macro_export]
macro_rules! ktest_assert_lt_ret {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp_ret!($chan, $x, <, $y)
    };
}

/// [`ktest_assert_le!`] returning from the enclosing body on failure
#[macro_export]
macro_rules! ktest_assert_le_ret {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp_ret!($chan, $x, <=, $y)
    };
}

/// [`ktest_assert_gt!`] returning from the enclosing body on failure
#[macro_export]
macro_rules! ktest_assert_gt_ret {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp_ret!($chan, $x, >, $y)
    };
}

/// [`ktest_assert_ge!`] returning from the enclosing body on failure
#[macro_export]
macro_rules! ktest_assert_ge_ret {
    ($chan:expr, $x:expr, $y:expr) => {
        $crate::__ktest_assert_cmp_ret!($chan, $x, >=, $y)
    };
}

/// Fail unless two strings have equal content (not identity)
#[macro_export]
macro_rules! ktest_assert_str_eq {
    ($chan:expr, $x:expr, $y:expr) => {{
        let x: &str = $x;
        let y: &str = $y;
        $crate::assert::fail_unless(
            $chan,
            x == y,
            file!(),
            line!(),
            format_args!(
                "Assertion '{}=={}' failed: {}==\"{}\", {}==\"{}\"",
                stringify!($x),
                stringify!($y),
                stringify!($x),
                x,
                stringify!($y),
                y
            ),
        )
    }};
}

/// Fail unless two strings differ in content
#[macro_export]
macro_rules! ktest_assert_str_ne {
    ($chan:expr, $x:expr, $y:expr) => {{
        let x: &str = $x;
        let y: &str = $y;
        $crate::assert::fail_unless(
            $chan,
            x != y,
            file!(),
            line!(),
            format_args!(
                "Assertion '{}!={}' failed: {}==\"{}\", {}==\"{}\"",
                stringify!($x),
                stringify!($y),
                stringify!($x),
                x,
                stringify!($y),
                y
            ),
        )
    }};
}

/// [`ktest_assert_str_eq!`] returning from the enclosing body on failure
#[macro_export]
macro_rules! ktest_assert_str_eq_ret {
    ($chan:expr, $x:expr, $y:expr) => {
        if !$crate::ktest_assert_str_eq!($chan, $x, $y) {
            return;
        }
    };
}
