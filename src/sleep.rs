use std::{fmt, future::Future, pin::Pin, time::Duration};

/// Future returned by [`Sleeper::sleep`].
pub type SleepFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Timer used between retry attempts.
///
/// The default implementation sleeps on the tokio timer. Tests can inject an
/// implementation that records the requested delays and returns immediately.
pub trait Sleeper: fmt::Debug + Send + Sync {
    fn sleep(&self, duration: Duration) -> SleepFuture;
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture {
        Box::pin(tokio::time::sleep(duration))
    }
}
