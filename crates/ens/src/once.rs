//! A value that is computed at most once and shared between concurrent callers.

use crate::error::EnsError;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::fmt;

type Pending<T> = Shared<BoxFuture<'static, Result<T, EnsError>>>;

/// The state of a [`OnceBinding`].
enum State<T> {
    /// Nobody asked for the value yet. The future has not been polled.
    Unstarted(Pending<T>),
    /// The value is being computed; callers subscribe to the same future.
    InFlight(Pending<T>),
    Ready(T),
    Failed(EnsError),
}

/// A lazily computed value.
///
/// The initializer runs on the first call to [`OnceBinding::get`]. Concurrent calls made while
/// it is running wait on the same computation, and its outcome, success or failure, is returned
/// to every later call.
pub(crate) struct OnceBinding<T> {
    state: Mutex<State<T>>,
}

impl<T> OnceBinding<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a new binding that will be initialized by `init`.
    pub(crate) fn new(init: BoxFuture<'static, Result<T, EnsError>>) -> Self {
        Self { state: Mutex::new(State::Unstarted(init.shared())) }
    }

    /// Returns `true` once the initializer has been started.
    pub(crate) fn is_started(&self) -> bool {
        !matches!(*self.state.lock(), State::Unstarted(_))
    }

    /// Returns the value, running the initializer if this is the first request.
    pub(crate) async fn get(&self) -> Result<T, EnsError> {
        let pending = {
            let mut state = self.state.lock();
            match &*state {
                State::Ready(value) => return Ok(value.clone()),
                State::Failed(err) => return Err(err.clone()),
                State::InFlight(pending) => pending.clone(),
                State::Unstarted(pending) => {
                    let pending = pending.clone();
                    *state = State::InFlight(pending.clone());
                    pending
                }
            }
        };

        let result = pending.await;

        let mut state = self.state.lock();
        if matches!(*state, State::InFlight(_)) {
            *state = match &result {
                Ok(value) => State::Ready(value.clone()),
                Err(err) => State::Failed(err.clone()),
            };
        }
        result
    }
}

impl<T> fmt::Debug for OnceBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.lock() {
            State::Unstarted(_) => "unstarted",
            State::InFlight(_) => "in flight",
            State::Ready(_) => "ready",
            State::Failed(_) => "failed",
        };
        f.debug_struct("OnceBinding").field("state", &state).finish()
    }
}
