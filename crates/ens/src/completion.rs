//! Delivery of a result to an optional completion callback.

use crate::error::EnsError;

/// Reports `result` to `callback`, then returns it.
///
/// The callback sees exactly the value or error that is returned, and is called once.
pub(crate) fn settle<T, F>(result: Result<T, EnsError>, callback: F) -> Result<T, EnsError>
where
    F: FnOnce(Result<&T, &EnsError>),
{
    callback(result.as_ref());
    result
}
