use std::fmt;

use crate::{constant_pool::CpIndex, ConstantPool};

/// A named, length prefixed attribute whose payload is kept as opaque bytes.
#[derive(PartialEq, Eq, Clone)]
pub struct Attribute {
    pub attribute_name_index: CpIndex,
    pub info: Vec<u8>,
}

impl Attribute {
    /// The `attribute_length` the payload was read with.
    pub fn length(&self) -> u32 {
        self.info.len() as u32
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("attribute_name_index", &self.attribute_name_index)
            .field("info", &format!("({} bytes)", self.info.len()))
            .finish()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Attributes(pub Vec<Attribute>);

impl Attributes {
    pub fn find_by_name(&self, name: &str, constant_pool: &ConstantPool) -> Option<&Attribute> {
        self.iter().find(|a| {
            constant_pool
                .utf8_str(a.attribute_name_index)
                .map_or(false, |s| s == name)
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
