use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::DecodeError;

/// Random-access little-endian reads at absolute offsets.
pub(crate) struct PacketReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

macro_rules! read_at {
    ($name:ident, $ty:ty, $width:expr, $read:ident) => {
        pub fn $name(&mut self, offset: usize) -> Result<$ty, DecodeError> {
            self.seek(offset);
            self.cursor
                .$read::<LittleEndian>()
                .map_err(|_| self.short(offset, $width))
        }
    };
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(buf) }
    }

    fn seek(&mut self, offset: usize) {
        self.cursor.set_position(offset as u64);
    }

    fn short(&self, offset: usize, width: usize) -> DecodeError {
        DecodeError::InsufficientBuffer {
            len: self.cursor.get_ref().len(),
            min: offset + width,
        }
    }

    read_at!(f32_at, f32, 4, read_f32);
    read_at!(i32_at, i32, 4, read_i32);
    read_at!(i16_at, i16, 2, read_i16);
    read_at!(u16_at, u16, 2, read_u16);

    pub fn u8_at(&mut self, offset: usize) -> Result<u8, DecodeError> {
        self.seek(offset);
        self.cursor.read_u8().map_err(|_| self.short(offset, 1))
    }

    /// `N` consecutive f32 values starting at `offset`.
    pub fn f32s_at<const N: usize>(&mut self, offset: usize) -> Result<[f32; N], DecodeError> {
        let mut out = [0.0; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.f32_at(offset + i * 4)?;
        }
        Ok(out)
    }
}
