use std::{borrow::Cow, fmt, io};

use cafedump_class_file::{Attributes, ClassFile, ConstantPool, CpInfo, FlagTarget, Result};

/// Text rendering of a decoded class file.
///
/// References that do not resolve are printed as `<reason>` instead of aborting the dump.
pub struct Dump<'a> {
    class_file: &'a ClassFile,
    show_pool: bool,
}

impl<'a> Dump<'a> {
    pub fn new(class_file: &'a ClassFile) -> Self {
        Self {
            class_file,
            show_pool: true,
        }
    }

    pub fn show_pool(mut self, show_pool: bool) -> Self {
        self.show_pool = show_pool;
        self
    }

    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)
    }

    fn write_pool(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool = &self.class_file.constant_pool;
        writeln!(f, "Printing constant pool of {} items...", pool.iter().count())?;

        for (index, cp_info) in pool.iter() {
            write!(f, "Item {} {}: ", index, cp_info.kind())?;
            match cp_info {
                CpInfo::Utf8(utf8) => match utf8.to_str() {
                    Some(s) => writeln!(f, "{}", s)?,
                    None => writeln!(f, "{}", String::from_utf8_lossy(&utf8.bytes))?,
                },
                CpInfo::Integer(value) => writeln!(f, "{}", value)?,
                CpInfo::Float(float) => writeln!(f, "{}", float.as_float())?,
                CpInfo::Long(wide) => writeln!(f, "{}", wide.as_long())?,
                CpInfo::Double(wide) => writeln!(f, "{}", wide.as_double())?,
                CpInfo::Class(class) => writeln!(f, "{}", class.name_index)?,
                CpInfo::String(string) => writeln!(f, "{}", string.string_index)?,
                CpInfo::FieldRef(r) | CpInfo::MethodRef(r) | CpInfo::InterfaceMethodRef(r) => {
                    writeln!(f, "{}.{}", r.class_index, r.name_and_type_index)?
                }
                CpInfo::NameAndType(nat) => {
                    writeln!(f, "{}.{}", nat.name_index, nat.descriptor_index)?
                }
                CpInfo::Unusable => writeln!(f)?,
            }
        }

        Ok(())
    }

    fn write_attributes(&self, f: &mut fmt::Formatter<'_>, attributes: &Attributes) -> fmt::Result {
        for attribute in attributes {
            let name = or_placeholder(self.class_file.attribute_name(attribute));
            writeln!(f, "\tAttribute name: {}", name)?;
            writeln!(f, "\tAttribute length: {}", attribute.length())?;
            writeln!(f, "\tAttribute: {:?}", String::from_utf8_lossy(&attribute.info))?;
        }

        Ok(())
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class_file = self.class_file;
        let pool = &class_file.constant_pool;

        writeln!(f, "Minor number: {}", class_file.minor_version)?;
        writeln!(f, "Major number: {}", class_file.major_version)?;
        writeln!(f, "Constant pool size: {}", pool.count())?;
        writeln!(f, "Constant table size: {}b", table_size(pool))?;
        if self.show_pool {
            self.write_pool(f)?;
        }

        let flags = class_file.access_flags;
        writeln!(
            f,
            "Access flags: {:x} ({})",
            flags.bits(),
            flags.names(FlagTarget::Class).join(" | ")
        )?;
        writeln!(f, "This class: {}", or_placeholder(class_file.class_name()))?;
        let super_class = match class_file.super_class() {
            Ok(Some(name)) => name,
            Ok(None) => Cow::Borrowed("<none>"),
            Err(e) => Cow::Owned(format!("<{}>", e)),
        };
        writeln!(f, "Super class: {}", super_class)?;

        writeln!(f, "Interfaces count: {}", class_file.interfaces.len())?;
        writeln!(f, "Printing {} interfaces...", class_file.interfaces.len())?;
        for index in &class_file.interfaces {
            writeln!(f, "Interface: {}", or_placeholder(pool.resolve_class_name(*index)))?;
        }

        writeln!(f, "Printing {} fields...", class_file.fields.len())?;
        for field in &class_file.fields {
            let descriptor = or_placeholder(class_file.field_descriptor(field));
            let name = or_placeholder(class_file.field_name(field));
            writeln!(f, "{} {}", field_type_name(&descriptor), name)?;
            self.write_attributes(f, &field.attributes)?;
        }

        writeln!(f, "Printing {} methods...", class_file.methods.len())?;
        for method in &class_file.methods {
            let name = or_placeholder(class_file.method_name(method));
            let descriptor = or_placeholder(class_file.method_descriptor(method));
            writeln!(f, "{} {}", name, descriptor)?;
            self.write_attributes(f, &method.attributes)?;
        }

        writeln!(f, "Printing {} attributes...", class_file.attributes.len())?;
        self.write_attributes(f, &class_file.attributes)
    }
}

fn or_placeholder(result: Result<Cow<'_, str>>) -> Cow<'_, str> {
    result.unwrap_or_else(|e| Cow::Owned(format!("<{}>", e)))
}

/// Encoded size of the pool entries, excluding their tag bytes.
fn table_size(pool: &ConstantPool) -> usize {
    pool.iter()
        .map(|(_, cp_info)| match cp_info {
            CpInfo::Utf8(utf8) => 2 + utf8.bytes.len(),
            CpInfo::Integer(_) | CpInfo::Float(_) => 4,
            CpInfo::Long(_) | CpInfo::Double(_) => 8,
            CpInfo::Class(_) | CpInfo::String(_) => 2,
            CpInfo::FieldRef(_)
            | CpInfo::MethodRef(_)
            | CpInfo::InterfaceMethodRef(_)
            | CpInfo::NameAndType(_) => 4,
            CpInfo::Unusable => 0,
        })
        .sum()
}

fn field_type_name(descriptor: &str) -> &'static str {
    match descriptor.chars().next() {
        Some('B') => "byte",
        Some('C') => "char",
        Some('D') => "double",
        Some('F') => "float",
        Some('I') => "int",
        Some('J') => "long",
        Some('L') => "reference",
        Some('S') => "short",
        Some('Z') => "boolean",
        Some('[') => "array",
        _ => "Undefined",
    }
}
