pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Error type carried across the hardware trait boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A newline-delimited text channel to a weight sensor.
///
/// Implementations own the hardware handle; an absent device is modelled by the
/// caller holding `None` rather than by an error from this trait.
pub trait LineSource {
    /// Read one line with its terminator stripped, or fail if none arrives within `timeout`.
    fn read_line(&mut self, timeout: std::time::Duration) -> Result<String, BoxError>;

    /// Drop any buffered-but-unread input so the next line is a fresh measurement.
    fn flush_input(&mut self) -> Result<(), BoxError>;
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn read_line(&mut self, timeout: std::time::Duration) -> Result<String, BoxError> {
        (**self).read_line(timeout)
    }

    fn flush_input(&mut self) -> Result<(), BoxError> {
        (**self).flush_input()
    }
}
