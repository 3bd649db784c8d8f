/// One wire communication error type.
#[derive(Debug, PartialEq)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying bus master.
    Other(E),
    /// No presence pulse followed the reset, so no slave answered.
    NoDevicePresent,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}
