//! Caller-side payload buffers.
//!
//! A command argument or result crosses the caller boundary through a
//! [`UserBuffer`]. Byte slices are the in-process implementation; a host
//! integration backs it with its own copy-from/copy-to-user primitives.

/// Copy across the caller boundary failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferFault;

/// Buffer owned by the caller of a dispatched command.
pub trait UserBuffer {
    /// Size in bytes.
    fn len(&self) -> usize;

    /// `true` for a zero-length buffer.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `dst.len()` bytes out of the caller's buffer.
    fn copy_in(&self, dst: &mut [u8]) -> Result<(), TransferFault>;

    /// Copy `src` into the caller's buffer.
    fn copy_out(&mut self, src: &[u8]) -> Result<(), TransferFault>;
}

impl UserBuffer for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_in(&self, dst: &mut [u8]) -> Result<(), TransferFault> {
        let src = self.get(..dst.len()).ok_or(TransferFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }

    fn copy_out(&mut self, src: &[u8]) -> Result<(), TransferFault> {
        let dst = self.get_mut(..src.len()).ok_or(TransferFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl<const N: usize> UserBuffer for [u8; N] {
    fn len(&self) -> usize {
        N
    }

    fn copy_in(&self, dst: &mut [u8]) -> Result<(), TransferFault> {
        self.as_slice().copy_in(dst)
    }

    fn copy_out(&mut self, src: &[u8]) -> Result<(), TransferFault> {
        self.as_mut_slice().copy_out(src)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_array_round_trip() {
        let mut buf = [0u8; 4];
        buf.copy_out(&7i32.to_ne_bytes()).unwrap();
        let mut raw = [0u8; 4];
        buf.copy_in(&mut raw).unwrap();
        assert_eq!(i32::from_ne_bytes(raw), 7);
    }

    #[test]
    fn test_short_buffer_faults() {
        let mut buf = [0u8; 2];
        assert_eq!(buf.copy_out(&[1, 2, 3, 4]), Err(TransferFault));
        let mut raw = [0u8; 4];
        assert_eq!(buf.as_slice().copy_in(&mut raw), Err(TransferFault));
        assert_eq!(buf, [0, 0]);
    }
}
