//! Pre-computed type classification flags.
//!
//! The executor asks the same handful of questions about operand types on
//! every record ("is this numeric?", "can this be indexed?"). `TypeFlags`
//! answers them with a single mask test.

use bitflags::bitflags;

bitflags! {
    /// Classification bits for a [`Type`](crate::Type).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u16 {
        /// One of `integer`, `long`, `double`, `decimal`.
        const NUMERIC = 1 << 0;
        /// A scalar built-in (numerics, `boolean`, `string`, `date`).
        const PRIMITIVE = 1 << 1;
        /// Supports ordinal or key based `get_stored`/`set_stored`.
        const INDEXABLE = 1 << 2;
        /// `list`, `map` or `record`.
        const CONTAINER = 1 << 3;
        /// `date-field` or `log-level` symbol.
        const SYMBOL = 1 << 4;
        /// A type variable, only valid in native signatures.
        const GENERIC = 1 << 5;
        /// The `null` type.
        const NULLISH = 1 << 6;
        /// The `error` type.
        const ERROR = 1 << 7;
        /// Values of this type have an ordering (`<`, `>`).
        const ORDERED = 1 << 8;
        /// A type with no values (`void`).
        const UNINHABITED = 1 << 9;
    }
}

impl TypeFlags {
    /// Check whether any of the given flags is set.
    #[inline]
    pub fn has_any(self, other: TypeFlags) -> bool {
        self.intersects(other)
    }
}
