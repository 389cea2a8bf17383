use thiserror::Error;

use crate::constant_pool::{tag_name, CpIndex};

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ClassFileError {
    #[error("Invalid magic identifier: 0x{0:X}")]
    InvalidMagic(u32),
    #[error("Unexpected end of input at offset {offset}: wanted {wanted} bytes, {remaining} remaining")]
    UnexpectedEof {
        offset: usize,
        wanted: usize,
        remaining: usize,
    },
    #[error("Unknown constant pool tag {tag} ({}) for entry {index} at offset {offset}", tag_name(*.tag))]
    UnknownConstantTag { tag: u8, index: u16, offset: usize },
    #[error("Invalid constant pool count: {0}")]
    InvalidConstantPoolCount(u16),
    #[error("Constant pool consumed {consumed} slots, but {declared} were declared")]
    ConstantPoolSlotMismatch { consumed: usize, declared: usize },
    #[error("Attribute declares {declared} bytes, but only {available} can be read")]
    AttributeLengthMismatch { declared: u32, available: usize },
    #[error("Constant pool index {index} is out of range (count {count})")]
    IndexOutOfRange { index: CpIndex, count: u16 },
    #[error("Expected {expected} at constant pool index {index}, found {found}")]
    UnexpectedEntryVariant {
        index: CpIndex,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Constant pool entry {index} is not valid modified UTF-8")]
    InvalidUtf8 { index: CpIndex },
}
