/// Return a failed `VerifyResponse` when the expression is an error. Used by the verification functions
/// which report malformed input as `verified = false` instead of an error.
macro_rules! try_or_fail {
    ($expr: expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => return $crate::error::VerifyResponse::failure(e),
        }
    };
}
