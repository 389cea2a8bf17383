// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html

mod access_flags;
pub mod attributes;
mod class_file;
#[macro_use]
pub mod constant_pool;
mod cursor;
mod error;
mod parser;

pub use self::class_file::{ClassFile, FieldInfo, MemberInfo, MethodInfo};
pub use access_flags::{AccessFlags, FlagTarget};
pub use attributes::{Attribute, Attributes};
pub use constant_pool::{ConstantPool, CpIndex, CpInfo};
pub use cursor::Cursor;
pub use error::ClassFileError;
pub use parser::{Parser, MAGIC};

pub type Result<T, E = ClassFileError> = std::result::Result<T, E>;

/// Decodes a complete class file held in memory.
pub fn decode(bytes: &[u8]) -> Result<ClassFile> {
    ClassFile::parse(bytes)
}
