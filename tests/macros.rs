//! Common test macros.

/// Check that a floating-point value is within a tolerance of the expected value.
///
/// # Usage
/// ```
/// assert_approx_eq!(actual, expected);
/// assert_approx_eq!(actual, expected, epsilon);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr) => {
        assert_approx_eq!($actual, $expected, 1e-10)
    };
    ($actual:expr, $expected:expr, $epsilon:expr) => {
        let actual: f64 = $actual;
        let expected: f64 = $expected;
        let epsilon: f64 = $epsilon;
        let diff = (actual - expected).abs();
        assert!(
            diff <= epsilon,
            "assertion failed: `(left ≈ right)`\n  left: `{actual:?}`,\n right: `{expected:?}`,\n  diff: `{diff:?}`,\n   eps: `{epsilon:?}`"
        );
    };
}

/// Assert that a result failed with the given error code.
#[macro_export]
macro_rules! assert_error_code {
    ($result:expr, $code:expr) => {
        match $result {
            Ok(value) => panic!("expected error code {}, got Ok({value:?})", $code),
            Err(err) => assert_eq!(err.code(), $code, "unexpected error: {err}"),
        }
    };
}
