use core::time::Duration;

use crate::{
    error::{Error, Result},
    id::SnowflakeLayout,
    time::TWITTER_EPOCH,
};

/// Construction parameters for a [`SnowflakeGenerator`].
///
/// The defaults are the Twitter format: a [`SnowflakeLayout::TWITTER`] bit
/// split, [`TWITTER_EPOCH`], and zero clock tolerance (any backwards step is
/// an error).
///
/// ```
/// use core::time::Duration;
/// use idforge::{DISCORD_EPOCH, SnowflakeConfig};
///
/// let config = SnowflakeConfig::new(3, 7)
///     .with_epoch(DISCORD_EPOCH)
///     .with_clock_tolerance(Duration::from_millis(5));
/// assert!(config.validate().is_ok());
/// ```
///
/// [`SnowflakeGenerator`]: crate::generator::SnowflakeGenerator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnowflakeConfig {
    pub datacenter_id: u64,
    pub worker_id: u64,
    /// Origin of the timestamp field, as a duration since the UNIX epoch.
    pub epoch: Duration,
    pub layout: SnowflakeLayout,
    /// How far the clock may fall behind the last issued timestamp before
    /// generation fails. Within the tolerance the generator waits for the
    /// clock to catch up.
    pub clock_tolerance: Duration,
}

impl Default for SnowflakeConfig {
    fn default() -> Self {
        Self {
            datacenter_id: 0,
            worker_id: 0,
            epoch: TWITTER_EPOCH,
            layout: SnowflakeLayout::TWITTER,
            clock_tolerance: Duration::ZERO,
        }
    }
}

impl SnowflakeConfig {
    #[must_use]
    pub fn new(datacenter_id: u64, worker_id: u64) -> Self {
        Self {
            datacenter_id,
            worker_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_epoch(mut self, epoch: Duration) -> Self {
        self.epoch = epoch;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: SnowflakeLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_clock_tolerance(mut self, tolerance: Duration) -> Self {
        self.clock_tolerance = tolerance;
        self
    }

    pub(crate) fn epoch_millis(&self) -> u64 {
        u64::try_from(self.epoch.as_millis()).unwrap_or(u64::MAX)
    }

    pub(crate) fn tolerance_millis(&self) -> u64 {
        u64::try_from(self.clock_tolerance.as_millis()).unwrap_or(u64::MAX)
    }

    /// Checks that the datacenter and worker ids fit the layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let max_datacenter_id = self.layout.max_datacenter_id();
        if self.datacenter_id > max_datacenter_id {
            return Err(Error::config(format!(
                "datacenter id {} is outside [0, {max_datacenter_id}] for a {}-bit field",
                self.datacenter_id,
                self.layout.datacenter_bits()
            )));
        }
        let max_worker_id = self.layout.max_worker_id();
        if self.worker_id > max_worker_id {
            return Err(Error::config(format!(
                "worker id {} is outside [0, {max_worker_id}] for a {}-bit field",
                self.worker_id,
                self.layout.worker_bits()
            )));
        }
        Ok(())
    }
}
