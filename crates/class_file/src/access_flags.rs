use bitflags::bitflags;

bitflags! {
    /// Access and property flags of a class, field or method.
    ///
    /// Several bits mean different things depending on where they appear, e.g. `0x0020` is
    /// `ACC_SUPER` on a class and `ACC_SYNCHRONIZED` on a method. `Debug` prints every alias
    /// of a set bit; use [`AccessFlags::names`] for the names that apply to one kind of entity.
    pub struct AccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE = 0x0040;
        const BRIDGE = 0x0040;
        const TRANSIENT = 0x0080;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}

/// The kind of entity a set of flags was read from.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FlagTarget {
    Class,
    Field,
    Method,
}

const CLASS_FLAGS: &[(AccessFlags, &str)] = &[
    (AccessFlags::PUBLIC, "PUBLIC"),
    (AccessFlags::FINAL, "FINAL"),
    (AccessFlags::SUPER, "SUPER"),
    (AccessFlags::INTERFACE, "INTERFACE"),
    (AccessFlags::ABSTRACT, "ABSTRACT"),
    (AccessFlags::SYNTHETIC, "SYNTHETIC"),
    (AccessFlags::ANNOTATION, "ANNOTATION"),
    (AccessFlags::ENUM, "ENUM"),
    (AccessFlags::MODULE, "MODULE"),
];

const FIELD_FLAGS: &[(AccessFlags, &str)] = &[
    (AccessFlags::PUBLIC, "PUBLIC"),
    (AccessFlags::PRIVATE, "PRIVATE"),
    (AccessFlags::PROTECTED, "PROTECTED"),
    (AccessFlags::STATIC, "STATIC"),
    (AccessFlags::FINAL, "FINAL"),
    (AccessFlags::VOLATILE, "VOLATILE"),
    (AccessFlags::TRANSIENT, "TRANSIENT"),
    (AccessFlags::SYNTHETIC, "SYNTHETIC"),
    (AccessFlags::ENUM, "ENUM"),
];

const METHOD_FLAGS: &[(AccessFlags, &str)] = &[
    (AccessFlags::PUBLIC, "PUBLIC"),
    (AccessFlags::PRIVATE, "PRIVATE"),
    (AccessFlags::PROTECTED, "PROTECTED"),
    (AccessFlags::STATIC, "STATIC"),
    (AccessFlags::FINAL, "FINAL"),
    (AccessFlags::SYNCHRONIZED, "SYNCHRONIZED"),
    (AccessFlags::BRIDGE, "BRIDGE"),
    (AccessFlags::VARARGS, "VARARGS"),
    (AccessFlags::NATIVE, "NATIVE"),
    (AccessFlags::ABSTRACT, "ABSTRACT"),
    (AccessFlags::STRICT, "STRICT"),
    (AccessFlags::SYNTHETIC, "SYNTHETIC"),
];

impl AccessFlags {
    /// Names of the set flags that are defined for `target`, in bit order.
    ///
    /// Bits with no meaning for `target` are left out.
    pub fn names(&self, target: FlagTarget) -> Vec<&'static str> {
        let table = match target {
            FlagTarget::Class => CLASS_FLAGS,
            FlagTarget::Field => FIELD_FLAGS,
            FlagTarget::Method => METHOD_FLAGS,
        };

        table
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

#[cfg(test)]
mod access_flags_tests {
    use super::*;

    #[test]
    fn it_should_keep_every_bit() {
        assert_eq!(AccessFlags::from_bits_truncate(0xffff).bits(), 0xffff);
        assert_eq!(
            AccessFlags::from_bits_truncate(0x0021),
            AccessFlags::PUBLIC | AccessFlags::SUPER
        );
    }

    #[test]
    fn it_should_name_shared_bits_by_target() {
        let flags = AccessFlags::from_bits_truncate(0x0021);

        assert_eq!(flags.names(FlagTarget::Class), vec!["PUBLIC", "SUPER"]);
        assert_eq!(flags.names(FlagTarget::Method), vec!["PUBLIC", "SYNCHRONIZED"]);
        assert_eq!(flags.names(FlagTarget::Field), vec!["PUBLIC"]);
    }

    #[test]
    fn it_should_name_varargs_and_transient_apart() {
        let flags = AccessFlags::from_bits_truncate(0x0089);

        assert_eq!(
            flags.names(FlagTarget::Method),
            vec!["PUBLIC", "STATIC", "VARARGS"]
        );
        assert_eq!(
            flags.names(FlagTarget::Field),
            vec!["PUBLIC", "STATIC", "TRANSIENT"]
        );
    }
}
