use std::borrow::Cow;

use crate::{
    attributes::{Attribute, Attributes},
    constant_pool::CpIndex,
    parser::Parser,
    AccessFlags, ConstantPool, Result,
};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: AccessFlags,
    pub this_class: CpIndex,
    pub super_class: CpIndex,
    pub interfaces: Vec<CpIndex>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Attributes,
}
impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<ClassFile> {
        Parser::new(bytes).parse()
    }

    /// `(major, minor)`
    pub fn version(&self) -> (u16, u16) {
        (self.major_version, self.minor_version)
    }

    pub fn class_name(&self) -> Result<Cow<'_, str>> {
        self.constant_pool.resolve_class_name(self.this_class)
    }

    pub fn super_class(&self) -> Result<Option<Cow<'_, str>>> {
        // Only java/lang/Object has no direct superclass, which is encoded as index zero.
        if self.super_class.0 == 0 {
            return Ok(None);
        }

        Ok(Some(self.constant_pool.resolve_class_name(self.super_class)?))
    }

    pub fn interface_names(&self) -> Result<Vec<Cow<'_, str>>> {
        self.interfaces
            .iter()
            .map(|index| self.constant_pool.resolve_class_name(*index))
            .collect()
    }

    pub fn field_name(&self, field: &FieldInfo) -> Result<Cow<'_, str>> {
        self.constant_pool.utf8_str(field.name_index)
    }

    pub fn field_descriptor(&self, field: &FieldInfo) -> Result<Cow<'_, str>> {
        self.constant_pool.utf8_str(field.descriptor_index)
    }

    pub fn method_name(&self, method: &MethodInfo) -> Result<Cow<'_, str>> {
        self.constant_pool.utf8_str(method.name_index)
    }

    pub fn method_descriptor(&self, method: &MethodInfo) -> Result<Cow<'_, str>> {
        self.constant_pool.utf8_str(method.descriptor_index)
    }

    pub fn attribute_name(&self, attribute: &Attribute) -> Result<Cow<'_, str>> {
        self.constant_pool.utf8_str(attribute.attribute_name_index)
    }
}

/// A `field_info` or `method_info` record; both share one layout.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MemberInfo {
    pub access_flags: AccessFlags,
    pub name_index: CpIndex,
    pub descriptor_index: CpIndex,
    pub attributes: Attributes,
}

pub type FieldInfo = MemberInfo;
pub type MethodInfo = MemberInfo;
