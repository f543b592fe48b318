/// The outcome of a single non-blocking generation attempt.
///
/// - [`Poll::Ready`] carries a freshly generated ID.
/// - [`Poll::Pending`] means the generator cannot issue an ID until the clock
///   has advanced by `yield_for` milliseconds: the sequence is exhausted for
///   the current tick, or the clock is behind the last issued timestamp within
///   the allowed tolerance.
///
/// This allows non-blocking generation loops and custom backoff strategies.
///
/// # Example
///
/// ```
/// use idforge::{Poll, SnowflakeConfig, SnowflakeGenerator, SystemClock};
///
/// let generator = SnowflakeGenerator::new(SnowflakeConfig::new(0, 1), SystemClock)?;
/// match generator.poll_id()? {
///     Poll::Ready { id } => println!("ID: {id}"),
///     Poll::Pending { yield_for } => println!("back off for {yield_for} ms"),
/// }
/// # Ok::<(), idforge::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll<T> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: T,
    },
    /// No ID could be generated yet.
    Pending {
        /// Milliseconds to wait before polling again.
        yield_for: u64,
    },
}
