/// Monotonic millisecond time source.
///
/// Used to bound status polls and to time temperature conversions.
/// The origin is arbitrary, only differences are used, and wrap-around
/// is handled with wrapping arithmetic.
pub trait Clock {
    /// Milliseconds elapsed since the clock's origin.
    fn now_ms(&mut self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now_ms(&mut self) -> u64 {
        (**self).now_ms()
    }
}
