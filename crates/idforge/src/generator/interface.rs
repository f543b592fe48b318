use crate::error::Result;

/// The single contract ID consumers depend on.
///
/// Callers that only need "the next ID" (a primary key, a correlation token,
/// a cache key) can hold any generator behind this trait without knowing
/// which format it produces.
///
/// ```
/// use idforge::{IdGenerator, MonoUlidGenerator, SystemClock, ThreadRandom};
///
/// fn next_key<G: IdGenerator>(generator: &G) -> idforge::Result<String>
/// where
///     G::Id: ToString,
/// {
///     Ok(generator.generate()?.to_string())
/// }
///
/// let generator = MonoUlidGenerator::new(SystemClock, ThreadRandom);
/// assert_eq!(next_key(&generator)?.len(), 26);
/// # Ok::<(), idforge::Error>(())
/// ```
pub trait IdGenerator {
    /// The identifier type this generator produces.
    type Id;

    /// Generates the next identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when the generator cannot produce a valid ID; see the
    /// implementing type for the conditions.
    fn generate(&self) -> Result<Self::Id>;
}
