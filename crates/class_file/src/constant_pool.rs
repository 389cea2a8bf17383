use std::{borrow::Cow, fmt};

use crate::{ClassFileError, Result};

pub const CONSTANT_UTF8: u8 = 1;
pub const CONSTANT_INTEGER: u8 = 3;
pub const CONSTANT_FLOAT: u8 = 4;
pub const CONSTANT_LONG: u8 = 5;
pub const CONSTANT_DOUBLE: u8 = 6;
pub const CONSTANT_CLASS: u8 = 7;
pub const CONSTANT_STRING: u8 = 8;
pub const CONSTANT_FIELD_REF: u8 = 9;
pub const CONSTANT_METHOD_REF: u8 = 10;
pub const CONSTANT_INTERFACE_METHOD_REF: u8 = 11;
pub const CONSTANT_NAME_AND_TYPE: u8 = 12;
// Known to the format, but not decoded.
pub const CONSTANT_METHOD_HANDLE: u8 = 15;
pub const CONSTANT_METHOD_TYPE: u8 = 16;
pub const CONSTANT_INVOKE_DYNAMIC: u8 = 18;

/// Human readable name of a constant pool tag byte.
pub fn tag_name(tag: u8) -> &'static str {
    match tag {
        CONSTANT_UTF8 => "Utf8",
        CONSTANT_INTEGER => "Integer",
        CONSTANT_FLOAT => "Float",
        CONSTANT_LONG => "Long",
        CONSTANT_DOUBLE => "Double",
        CONSTANT_CLASS => "Class",
        CONSTANT_STRING => "String",
        CONSTANT_FIELD_REF => "FieldRef",
        CONSTANT_METHOD_REF => "MethodRef",
        CONSTANT_INTERFACE_METHOD_REF => "InterfaceMethodRef",
        CONSTANT_NAME_AND_TYPE => "NameAndType",
        CONSTANT_METHOD_HANDLE => "MethodHandle",
        CONSTANT_METHOD_TYPE => "MethodType",
        CONSTANT_INVOKE_DYNAMIC => "InvokeDynamic",
        _ => "Undefined",
    }
}

/// A raw, unvalidated index into the constant pool.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct CpIndex(pub u16);

impl fmt::Display for CpIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u16> for CpIndex {
    fn from(index: u16) -> Self {
        Self(index)
    }
}

#[macro_export]
macro_rules! matches_cp_info {
    ($cp:expr, $index:expr, $i:ident) => {
        match $cp.get_entry($index)? {
            $crate::constant_pool::CpInfo::$i(n) => Ok(n),
            c => Err($crate::ClassFileError::UnexpectedEntryVariant {
                index: $index,
                expected: stringify!($i),
                found: c.kind(),
            }),
        }
    };
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ConstantPool {
    // Slot 0 of the pool is stored at position 0 here, i.e. shifted by one.
    cp_infos: Vec<CpInfo>,
}

impl ConstantPool {
    /// Fails if the slots could not be described by a `u16` constant pool count.
    pub fn new(cp_infos: Vec<CpInfo>) -> Result<Self> {
        const MAX_SLOTS: usize = u16::MAX as usize - 1;
        if cp_infos.len() > MAX_SLOTS {
            return Err(ClassFileError::ConstantPoolSlotMismatch {
                consumed: cp_infos.len(),
                declared: MAX_SLOTS,
            });
        }

        Ok(Self { cp_infos })
    }

    /// The declared `constant_pool_count`, one more than the number of slots.
    pub fn count(&self) -> u16 {
        self.cp_infos.len() as u16 + 1
    }

    pub fn get_entry(&self, index: CpIndex) -> Result<&CpInfo> {
        let out_of_range = || ClassFileError::IndexOutOfRange {
            index,
            count: self.count(),
        };

        let slot = usize::from(index.0).checked_sub(1).ok_or_else(out_of_range)?;
        match self.cp_infos.get(slot) {
            Some(CpInfo::Unusable) | None => Err(out_of_range()),
            Some(cp_info) => Ok(cp_info),
        }
    }

    pub fn get_utf8(&self, index: CpIndex) -> Result<&Utf8Info> {
        matches_cp_info!(self, index, Utf8)
    }

    pub fn get_class(&self, index: CpIndex) -> Result<&ClassInfo> {
        matches_cp_info!(self, index, Class)
    }

    /// Resolves a Utf8 entry and decodes it from modified UTF-8.
    pub fn utf8_str(&self, index: CpIndex) -> Result<Cow<'_, str>> {
        self.get_utf8(index)?
            .to_str()
            .ok_or(ClassFileError::InvalidUtf8 { index })
    }

    /// Follows a Class entry to the Utf8 entry holding its name.
    pub fn resolve_class_name(&self, class_ref_index: CpIndex) -> Result<Cow<'_, str>> {
        let ClassInfo { name_index } = self.get_class(class_ref_index)?;
        self.utf8_str(*name_index)
    }

    /// Iterates over the usable slots, skipping the second slot of Long and Double entries.
    pub fn iter(&self) -> impl Iterator<Item = (CpIndex, &CpInfo)> {
        self.cp_infos
            .iter()
            .enumerate()
            .filter(|(_, cp_info)| !matches!(cp_info, CpInfo::Unusable))
            .map(|(slot, cp_info)| (CpIndex(slot as u16 + 1), cp_info))
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CpInfo {
    Utf8(Utf8Info),
    Integer(i32),
    Float(FloatInfo),
    Long(WideInfo),
    Double(WideInfo),
    Class(ClassInfo),
    String(StringInfo),
    FieldRef(RefInfo),
    MethodRef(RefInfo),
    InterfaceMethodRef(RefInfo),
    NameAndType(NameAndTypeInfo),
    /// Second slot of a Long or Double entry.
    Unusable,
}

impl CpInfo {
    pub fn tag(&self) -> Option<u8> {
        Some(match self {
            CpInfo::Utf8(_) => CONSTANT_UTF8,
            CpInfo::Integer(_) => CONSTANT_INTEGER,
            CpInfo::Float(_) => CONSTANT_FLOAT,
            CpInfo::Long(_) => CONSTANT_LONG,
            CpInfo::Double(_) => CONSTANT_DOUBLE,
            CpInfo::Class(_) => CONSTANT_CLASS,
            CpInfo::String(_) => CONSTANT_STRING,
            CpInfo::FieldRef(_) => CONSTANT_FIELD_REF,
            CpInfo::MethodRef(_) => CONSTANT_METHOD_REF,
            CpInfo::InterfaceMethodRef(_) => CONSTANT_INTERFACE_METHOD_REF,
            CpInfo::NameAndType(_) => CONSTANT_NAME_AND_TYPE,
            CpInfo::Unusable => return None,
        })
    }

    pub fn kind(&self) -> &'static str {
        self.tag().map_or("Unusable", tag_name)
    }

    /// Number of pool slots taken by this entry.
    pub fn slot_size(&self) -> usize {
        match self {
            CpInfo::Long(_) | CpInfo::Double(_) => 2,
            _ => 1,
        }
    }
}

#[derive(PartialEq, Eq, Clone)]
pub struct Utf8Info {
    pub length: u16,
    pub bytes: Vec<u8>,
}

impl Utf8Info {
    /// Decodes the payload from the JVM's modified UTF-8.
    pub fn to_str(&self) -> Option<Cow<'_, str>> {
        cesu8::from_java_cesu8(&self.bytes).ok()
    }
}

impl fmt::Debug for Utf8Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utf8Info")
            .field("length", &self.length)
            .field("bytes", &String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}

/// The raw bits of a Float entry; kept as bits so NaN entries compare equal.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FloatInfo {
    pub bits: u32,
}

impl FloatInfo {
    pub fn as_float(&self) -> f32 {
        f32::from_bits(self.bits)
    }
}

/// The two big-endian words of a Long or Double entry.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct WideInfo {
    pub high: u32,
    pub low: u32,
}

impl WideInfo {
    pub fn bits(&self) -> u64 {
        ((self.high as u64) << 32) | self.low as u64
    }

    pub fn as_long(&self) -> i64 {
        self.bits() as i64
    }

    pub fn as_double(&self) -> f64 {
        f64::from_bits(self.bits())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RefInfo {
    pub class_index: CpIndex,
    pub name_and_type_index: CpIndex,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ClassInfo {
    // Must point at a Utf8 entry holding a binary class name in internal form.
    pub name_index: CpIndex,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct StringInfo {
    pub string_index: CpIndex,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NameAndTypeInfo {
    pub name_index: CpIndex,
    pub descriptor_index: CpIndex,
}

#[cfg(test)]
mod constant_pool_tests {
    use super::*;

    fn utf8(s: &str) -> CpInfo {
        CpInfo::Utf8(Utf8Info {
            length: s.len() as u16,
            bytes: s.as_bytes().to_vec(),
        })
    }

    fn pool() -> ConstantPool {
        ConstantPool::new(vec![
            CpInfo::Class(ClassInfo {
                name_index: CpIndex(2),
            }),
            utf8("java/lang/Object"),
            CpInfo::Long(WideInfo {
                high: 0xffff_ffff,
                low: 0xffff_fffe,
            }),
            CpInfo::Unusable,
            CpInfo::Integer(-7),
        ])
        .unwrap()
    }

    #[test]
    fn it_should_report_the_declared_count() {
        assert_eq!(pool().count(), 6);
        assert_eq!(ConstantPool::new(vec![]).unwrap().count(), 1);
    }

    #[test]
    fn it_should_reject_more_slots_than_a_count_can_describe() {
        let largest = vec![CpInfo::Integer(0); u16::MAX as usize - 1];
        assert_eq!(ConstantPool::new(largest).unwrap().count(), u16::MAX);

        assert_eq!(
            ConstantPool::new(vec![CpInfo::Integer(0); u16::MAX as usize]),
            Err(ClassFileError::ConstantPoolSlotMismatch {
                consumed: 65535,
                declared: 65534
            })
        );
    }

    #[test]
    fn it_should_compare_nan_floats_by_their_bits() {
        let nan = CpInfo::Float(FloatInfo { bits: 0x7fc0_0000 });
        assert_eq!(nan, nan.clone());

        assert!(FloatInfo { bits: 0x7fc0_0000 }.as_float().is_nan());
        assert_ne!(
            CpInfo::Float(FloatInfo { bits: 0x7fc0_0000 }),
            CpInfo::Float(FloatInfo { bits: 0x7fc0_0001 })
        );
    }

    #[test]
    fn it_should_reject_index_zero() {
        assert_eq!(
            pool().get_entry(CpIndex(0)),
            Err(ClassFileError::IndexOutOfRange {
                index: CpIndex(0),
                count: 6
            })
        );
    }

    #[test]
    fn it_should_reject_indices_past_the_count() {
        assert!(pool().get_entry(CpIndex(5)).is_ok());
        assert!(matches!(
            pool().get_entry(CpIndex(6)),
            Err(ClassFileError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            pool().get_entry(CpIndex(u16::MAX)),
            Err(ClassFileError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn it_should_reject_the_slot_after_a_long() {
        let pool = pool();
        assert!(matches!(pool.get_entry(CpIndex(3)), Ok(CpInfo::Long(_))));
        assert_eq!(
            pool.get_entry(CpIndex(4)),
            Err(ClassFileError::IndexOutOfRange {
                index: CpIndex(4),
                count: 6
            })
        );
    }

    #[test]
    fn it_should_resolve_class_names() {
        assert_eq!(pool().resolve_class_name(CpIndex(1)).unwrap(), "java/lang/Object");
    }

    #[test]
    fn it_should_fail_to_resolve_a_class_name_through_the_wrong_variant() {
        assert_eq!(
            pool().resolve_class_name(CpIndex(2)),
            Err(ClassFileError::UnexpectedEntryVariant {
                index: CpIndex(2),
                expected: "Class",
                found: "Utf8"
            })
        );
    }

    #[test]
    fn it_should_skip_unusable_slots_when_iterating() {
        let indices = pool().iter().map(|(index, _)| index.0).collect::<Vec<_>>();
        assert_eq!(indices, vec![1, 2, 3, 5]);
    }

    #[test]
    fn it_should_reconstruct_wide_values() {
        let long = WideInfo {
            high: 0xffff_ffff,
            low: 0xffff_fffe,
        };
        assert_eq!(long.as_long(), -2);

        let one = WideInfo {
            high: 0x3ff0_0000,
            low: 0,
        };
        assert_eq!(one.as_double(), 1.0);

        let smallest_subnormal = WideInfo { high: 0, low: 1 };
        assert_eq!(smallest_subnormal.as_double(), f64::from_bits(1));
        assert!(smallest_subnormal.as_double() > 0.0);

        let negative_infinity = WideInfo {
            high: 0xfff0_0000,
            low: 0,
        };
        assert_eq!(negative_infinity.as_double(), f64::NEG_INFINITY);

        let nan = WideInfo {
            high: 0x7ff8_0000,
            low: 0,
        };
        assert!(nan.as_double().is_nan());
    }

    #[test]
    fn it_should_decode_modified_utf8() {
        // U+0000 is encoded on two bytes in modified UTF-8.
        let info = Utf8Info {
            length: 3,
            bytes: vec![b'a', 0xc0, 0x80],
        };
        assert_eq!(info.to_str().unwrap(), "a\0");

        let invalid = Utf8Info {
            length: 1,
            bytes: vec![0xff],
        };
        assert_eq!(invalid.to_str(), None);
    }
}
