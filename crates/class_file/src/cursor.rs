use byteorder::{BigEndian, ByteOrder};

use crate::{ClassFileError, Result};

type Endian = BigEndian;

/// Sequential reader over a borrowed class file buffer.
///
/// Every read either consumes exactly the requested number of bytes or fails
/// with [`ClassFileError::UnexpectedEof`] and leaves the position untouched.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(Endian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(Endian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = match self.pos.checked_add(n) {
            Some(end) if end <= self.buf.len() => end,
            _ => {
                return Err(ClassFileError::UnexpectedEof {
                    offset: self.pos,
                    wanted: n,
                    remaining: self.remaining(),
                })
            }
        };

        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }
}

#[cfg(test)]
mod cursor_tests {
    use super::*;

    #[test]
    fn it_should_read_big_endian_values() {
        let mut cursor = Cursor::new(&[0x01, 0x02, 0x03, 0xca, 0xfe, 0xba, 0xbe]);

        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_u16_be().unwrap(), 0x0203);
        assert_eq!(cursor.read_u32_be().unwrap(), 0xcafebabe);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn it_should_read_raw_bytes() {
        let mut cursor = Cursor::new(b"foobar");

        assert_eq!(cursor.read_bytes(3).unwrap(), b"foo");
        assert_eq!(cursor.read_bytes(0).unwrap(), b"");
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.read_bytes(3).unwrap(), b"bar");
    }

    #[test]
    fn it_should_fail_if_there_is_not_enough_data() {
        let mut cursor = Cursor::new(&[0xca, 0xfe, 0xba]);

        assert_eq!(
            cursor.read_u32_be(),
            Err(ClassFileError::UnexpectedEof {
                offset: 0,
                wanted: 4,
                remaining: 3
            })
        );
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_u16_be().unwrap(), 0xcafe);
    }

    #[test]
    fn it_should_not_overflow_on_huge_lengths() {
        let mut cursor = Cursor::new(&[0x00]);
        cursor.read_u8().unwrap();

        assert!(matches!(
            cursor.read_bytes(usize::MAX),
            Err(ClassFileError::UnexpectedEof { offset: 1, .. })
        ));
    }
}
