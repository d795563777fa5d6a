//! Qualifier and modifier flag sets shared by declaration specifiers and types.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// cv-qualifiers (plus C99 `restrict`) on a type or a pointer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TypeQualifiers: u8 {
        const CONST    = 0b0001;
        const VOLATILE = 0b0010;
        const RESTRICT = 0b0100;
    }
}

bitflags! {
    /// Modifiers written inside array brackets (`int a[const static 3]`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ArrayQualifiers: u8 {
        const CONST           = 0b0_0001;
        const VOLATILE        = 0b0_0010;
        const RESTRICT        = 0b0_0100;
        const STATIC          = 0b0_1000;
        const VARIABLE_LENGTH = 0b1_0000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct BasicModifiers: u8 {
        const SIGNED    = 0b000_0001;
        const UNSIGNED  = 0b000_0010;
        const SHORT     = 0b000_0100;
        const LONG      = 0b000_1000;
        const LONG_LONG = 0b001_0000;
        const COMPLEX   = 0b010_0000;
        const IMAGINARY = 0b100_0000;
    }
}

impl ArrayQualifiers {
    /// Qualifiers the adjusted pointer receives when an array parameter decays.
    pub fn pointer_qualifiers(self) -> TypeQualifiers {
        let mut quals = TypeQualifiers::empty();
        if self.contains(ArrayQualifiers::CONST) {
            quals |= TypeQualifiers::CONST;
        }
        if self.contains(ArrayQualifiers::VOLATILE) {
            quals |= TypeQualifiers::VOLATILE;
        }
        if self.contains(ArrayQualifiers::RESTRICT) {
            quals |= TypeQualifiers::RESTRICT;
        }
        quals
    }
}

impl fmt::Display for TypeQualifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = Vec::new();
        if self.contains(TypeQualifiers::CONST) {
            words.push("const");
        }
        if self.contains(TypeQualifiers::VOLATILE) {
            words.push("volatile");
        }
        if self.contains(TypeQualifiers::RESTRICT) {
            words.push("restrict");
        }
        write!(f, "{}", words.join(" "))
    }
}

impl fmt::Display for BasicModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = Vec::new();
        if self.contains(BasicModifiers::SIGNED) {
            words.push("signed");
        }
        if self.contains(BasicModifiers::UNSIGNED) {
            words.push("unsigned");
        }
        if self.contains(BasicModifiers::SHORT) {
            words.push("short");
        }
        if self.contains(BasicModifiers::LONG) {
            words.push("long");
        }
        if self.contains(BasicModifiers::LONG_LONG) {
            words.push("long long");
        }
        if self.contains(BasicModifiers::COMPLEX) {
            words.push("_Complex");
        }
        if self.contains(BasicModifiers::IMAGINARY) {
            words.push("_Imaginary");
        }
        write!(f, "{}", words.join(" "))
    }
}
