use log::{debug, trace};

use crate::{
    attributes::{Attribute, Attributes},
    class_file::MemberInfo,
    constant_pool::{
        self, ClassInfo, CpIndex, CpInfo, FloatInfo, NameAndTypeInfo, RefInfo, StringInfo, Utf8Info,
        WideInfo,
    },
    AccessFlags, ClassFile, ClassFileError, ConstantPool, Cursor, Result,
};

pub const MAGIC: u32 = 0xCAFEBABE;

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Header {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool_count: u16,
}

pub struct Parser<'a> {
    r: Cursor<'a>,
}
impl<'a> Parser<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            r: Cursor::new(buf),
        }
    }

    pub fn parse(&mut self) -> Result<ClassFile> {
        let header = self.parse_header()?;
        debug!(
            "class file version {}.{}, constant pool count {}",
            header.major_version,
            header.minor_version,
            header.constant_pool_count
        );

        let constant_pool = self.parse_constant_pool(header.constant_pool_count)?;
        let access_flags = AccessFlags::from_bits_truncate(self.read_u16()?);
        let this_class = self.read_index()?;
        let super_class = self.read_index()?;
        let interfaces = self.parse_interfaces()?;

        let fields_count = self.read_u16()?;
        let fields = (0..fields_count)
            .map(|_| self.parse_member_info())
            .collect::<Result<Vec<_>>>()?;

        let methods_count = self.read_u16()?;
        let methods = (0..methods_count)
            .map(|_| self.parse_member_info())
            .collect::<Result<Vec<_>>>()?;

        let attributes = self.parse_attributes()?;

        if self.r.remaining() > 0 {
            debug!(
                "ignoring {} trailing bytes at offset {}",
                self.r.remaining(),
                self.r.position()
            );
        }

        Ok(ClassFile {
            minor_version: header.minor_version,
            major_version: header.major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    fn parse_header(&mut self) -> Result<Header> {
        self.parse_magic_identifier()?;
        let (major_version, minor_version) = self.parse_version()?;
        let constant_pool_count = self.read_u16()?;

        Ok(Header {
            minor_version,
            major_version,
            constant_pool_count,
        })
    }

    fn parse_magic_identifier(&mut self) -> Result<()> {
        match self.read_u32()? {
            MAGIC => Ok(()),
            magic_identifier => Err(ClassFileError::InvalidMagic(magic_identifier)),
        }
    }

    fn parse_version(&mut self) -> Result<(u16, u16)> {
        let minor = self.read_u16()?;
        let major = self.read_u16()?;
        Ok((major, minor))
    }

    fn parse_constant_pool(&mut self, constant_pool_count: u16) -> Result<ConstantPool> {
        let declared = match constant_pool_count.checked_sub(1) {
            Some(declared) => declared as usize,
            None => return Err(ClassFileError::InvalidConstantPoolCount(constant_pool_count)),
        };

        let mut res = Vec::with_capacity(declared);
        while res.len() < declared {
            let index = res.len() as u16 + 1;
            let cp_info = self.parse_cp_info(index)?;
            trace!("constant pool {}: {:?}", CpIndex(index), cp_info);

            let slot_size = cp_info.slot_size();
            res.push(cp_info);
            (1..slot_size).for_each(|_| res.push(CpInfo::Unusable));
        }

        // A Long or Double in the last slot spills past the declared count.
        if res.len() != declared {
            return Err(ClassFileError::ConstantPoolSlotMismatch {
                consumed: res.len(),
                declared,
            });
        }

        ConstantPool::new(res)
    }

    fn parse_cp_info(&mut self, index: u16) -> Result<CpInfo> {
        let offset = self.r.position();
        let tag = self.read_u8()?;
        let cp_info = match tag {
            constant_pool::CONSTANT_UTF8 => self.parse_utf8()?,
            constant_pool::CONSTANT_INTEGER => CpInfo::Integer(self.read_u32()? as i32),
            constant_pool::CONSTANT_FLOAT => CpInfo::Float(FloatInfo {
                bits: self.read_u32()?,
            }),
            constant_pool::CONSTANT_LONG => CpInfo::Long(self.parse_wide()?),
            constant_pool::CONSTANT_DOUBLE => CpInfo::Double(self.parse_wide()?),
            constant_pool::CONSTANT_CLASS => self.parse_class_info()?,
            constant_pool::CONSTANT_STRING => self.parse_string()?,
            constant_pool::CONSTANT_FIELD_REF => CpInfo::FieldRef(self.parse_ref_info()?),
            constant_pool::CONSTANT_METHOD_REF => CpInfo::MethodRef(self.parse_ref_info()?),
            constant_pool::CONSTANT_INTERFACE_METHOD_REF => {
                CpInfo::InterfaceMethodRef(self.parse_ref_info()?)
            }
            constant_pool::CONSTANT_NAME_AND_TYPE => self.parse_name_and_type_info()?,
            // There is no way to find the start of the next entry past an unknown tag.
            _ => {
                return Err(ClassFileError::UnknownConstantTag { tag, index, offset });
            }
        };

        Ok(cp_info)
    }

    fn parse_utf8(&mut self) -> Result<CpInfo> {
        let length = self.read_u16()?;
        let bytes = self.r.read_bytes(length as usize)?.to_vec();

        Ok(CpInfo::Utf8(Utf8Info { length, bytes }))
    }

    fn parse_wide(&mut self) -> Result<WideInfo> {
        let high = self.read_u32()?;
        let low = self.read_u32()?;

        Ok(WideInfo { high, low })
    }

    fn parse_class_info(&mut self) -> Result<CpInfo> {
        let name_index = self.read_index()?;

        Ok(CpInfo::Class(ClassInfo { name_index }))
    }

    fn parse_string(&mut self) -> Result<CpInfo> {
        let string_index = self.read_index()?;

        Ok(CpInfo::String(StringInfo { string_index }))
    }

    fn parse_name_and_type_info(&mut self) -> Result<CpInfo> {
        let name_index = self.read_index()?;
        let descriptor_index = self.read_index()?;

        Ok(CpInfo::NameAndType(NameAndTypeInfo {
            name_index,
            descriptor_index,
        }))
    }

    fn parse_ref_info(&mut self) -> Result<RefInfo> {
        let class_index = self.read_index()?;
        let name_and_type_index = self.read_index()?;

        Ok(RefInfo {
            class_index,
            name_and_type_index,
        })
    }

    fn parse_interfaces(&mut self) -> Result<Vec<CpIndex>> {
        let interfaces_count = self.read_u16()?;
        (0..interfaces_count).map(|_| self.read_index()).collect()
    }

    fn parse_member_info(&mut self) -> Result<MemberInfo> {
        let access_flags = AccessFlags::from_bits_truncate(self.read_u16()?);
        let name_index = self.read_index()?;
        let descriptor_index = self.read_index()?;
        let attributes = self.parse_attributes()?;
        trace!(
            "member {}:{} with {} attributes",
            name_index,
            descriptor_index,
            attributes.len()
        );

        Ok(MemberInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_attribute(&mut self) -> Result<Attribute> {
        let attribute_name_index = self.read_index()?;
        let attribute_length = self.read_u32()?;
        let length = usize::try_from(attribute_length).map_err(|_| {
            ClassFileError::AttributeLengthMismatch {
                declared: attribute_length,
                available: self.r.remaining(),
            }
        })?;
        let info = self.r.read_bytes(length)?.to_vec();

        Ok(Attribute {
            attribute_name_index,
            info,
        })
    }

    fn parse_attributes(&mut self) -> Result<Attributes> {
        let attributes_count = self.read_u16()?;
        (0..attributes_count)
            .map(|_| self.parse_attribute())
            .collect::<Result<Vec<_>>>()
            .map(Attributes)
    }

    fn read_index(&mut self) -> Result<CpIndex> {
        Ok(CpIndex(self.read_u16()?))
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.r.read_u32_be()
    }

    fn read_u16(&mut self) -> Result<u16> {
        self.r.read_u16_be()
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.r.read_u8()
    }
}

#[cfg(test)]
mod parse_header_tests {
    use super::*;

    #[test]
    fn it_should_be_able_to_parse_a_header() {
        assert_eq!(
            Parser::new(&[0xca, 0xfe, 0xba, 0xbe, 0x00, 0x03, 0x00, 0x34, 0x00, 0x0f])
                .parse_header()
                .unwrap(),
            Header {
                minor_version: 3,
                major_version: 52,
                constant_pool_count: 15,
            }
        );
    }

    #[test]
    fn it_should_fail_if_the_magic_identifier_is_incorrect() {
        let mut parser = Parser::new(&[0xca, 0xfe, 0xba, 0xbf, 0x00, 0x00, 0x00, 0x34]);

        assert_eq!(
            parser.parse_header(),
            Err(ClassFileError::InvalidMagic(0xcafebabf))
        );
        assert_eq!(parser.r.position(), 4);
    }

    #[test]
    fn it_should_check_the_magic_identifier_before_the_length() {
        assert_eq!(
            Parser::new(&[0xde, 0xad, 0xbe, 0xef]).parse_header(),
            Err(ClassFileError::InvalidMagic(0xdeadbeef))
        );
    }

    #[test]
    fn it_should_fail_if_there_is_not_enough_data() {
        assert!(matches!(
            Parser::new(&[0xca, 0xfe, 0xba]).parse_magic_identifier(),
            Err(ClassFileError::UnexpectedEof { offset: 0, .. })
        ));
        assert!(matches!(
            Parser::new(&[0xca, 0xfe, 0xba, 0xbe, 0x00, 0x00, 0x00, 0x34, 0x00]).parse_header(),
            Err(ClassFileError::UnexpectedEof { offset: 8, .. })
        ));
    }
}
