use crate::SharedFuture;

/// Represents requirements for the wrapped single-owner future.
///
/// Implementors are expected to be move-only: cloning one would allow
/// its result to be retrieved twice. `is_ready` and `wait` must tolerate
/// being called repeatedly and from several threads at once.
pub trait UniqueFuture {
    type Output;
    type Error;

    /// Whether the future still refers to a computation.
    /// An invalid future is never consumed.
    fn is_valid(&self) -> bool;

    /// Non-blocking completion check.
    fn is_ready(&self) -> bool;

    /// Blocks the calling thread until the future completes.
    fn wait(&self);

    /// Blocks until completion and returns the outcome, consuming the future.
    fn get(self) -> Result<Self::Output, Self::Error>;

    /// Wraps this future into a [`SharedFuture`].
    fn share(self) -> SharedFuture<Self>
    where
        Self: Sized,
    {
        SharedFuture::new(self)
    }
}
