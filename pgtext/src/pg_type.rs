//! Postgres type identifiers and codec selection.

/// Postgres object identifier.
///
/// The oid type is implemented as an unsigned four-byte integer.
///
/// <https://www.postgresql.org/docs/current/datatype-oid.html>
pub type Oid = u32;

/// The closed set of postgres types this codec understands.
///
/// Every variant maps to exactly one scalar cast rule, or to an array codec
/// bound to its [`elem`][PgType::elem] type. Dispatch on this enum is
/// exhaustive, adding a type is a compile-time visible change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PgType {
    Bool,
    Bytea,
    Char,
    Int8,
    Int2,
    Int4,
    Text,
    Float4,
    Float8,
    Bpchar,
    Varchar,
    Date,
    Timestamp,
    Timestamptz,
    Numeric,

    BoolArray,
    ByteaArray,
    CharArray,
    Int8Array,
    Int2Array,
    Int4Array,
    TextArray,
    Float4Array,
    Float8Array,
    BpcharArray,
    VarcharArray,
    DateArray,
    TimestampArray,
    TimestamptzArray,
    NumericArray,
}

macro_rules! table {
    ($($variant:ident: $oid:literal, $name:literal, $elem:expr;)*) => {
        impl PgType {
            /// Look up a type by its catalog oid.
            pub const fn from_oid(oid: Oid) -> Option<PgType> {
                match oid {
                    $($oid => Some(PgType::$variant),)*
                    _ => None,
                }
            }

            /// The catalog oid of this type.
            pub const fn oid(self) -> Oid {
                match self {
                    $(PgType::$variant => $oid,)*
                }
            }

            /// The catalog name of this type, arrays with their `_` prefix.
            pub const fn name(self) -> &'static str {
                match self {
                    $(PgType::$variant => $name,)*
                }
            }

            /// The element type of an array type.
            ///
            /// Returns [`None`] for scalars. Multidimensional arrays share
            /// the element oid of the one-dimensional form, nesting lives in
            /// the literal, not in the type.
            pub const fn elem(self) -> Option<PgType> {
                match self {
                    $(PgType::$variant => $elem,)*
                }
            }
        }
    };
}

table! {
    Bool:             16, "bool",          None;
    Bytea:            17, "bytea",         None;
    Char:             18, "char",          None;
    Int8:             20, "int8",          None;
    Int2:             21, "int2",          None;
    Int4:             23, "int4",          None;
    Text:             25, "text",          None;
    Float4:          700, "float4",        None;
    Float8:          701, "float8",        None;
    Bpchar:         1042, "bpchar",        None;
    Varchar:        1043, "varchar",       None;
    Date:           1082, "date",          None;
    Timestamp:      1114, "timestamp",     None;
    Timestamptz:    1184, "timestamptz",   None;
    Numeric:        1700, "numeric",       None;

    BoolArray:      1000, "_bool",         Some(PgType::Bool);
    ByteaArray:     1001, "_bytea",        Some(PgType::Bytea);
    CharArray:      1002, "_char",         Some(PgType::Char);
    Int2Array:      1005, "_int2",         Some(PgType::Int2);
    Int4Array:      1007, "_int4",         Some(PgType::Int4);
    TextArray:      1009, "_text",         Some(PgType::Text);
    BpcharArray:    1014, "_bpchar",       Some(PgType::Bpchar);
    VarcharArray:   1015, "_varchar",      Some(PgType::Varchar);
    Int8Array:      1016, "_int8",         Some(PgType::Int8);
    Float4Array:    1021, "_float4",       Some(PgType::Float4);
    Float8Array:    1022, "_float8",       Some(PgType::Float8);
    TimestampArray: 1115, "_timestamp",    Some(PgType::Timestamp);
    DateArray:      1182, "_date",         Some(PgType::Date);
    TimestamptzArray: 1185, "_timestamptz", Some(PgType::Timestamptz);
    NumericArray:   1231, "_numeric",      Some(PgType::Numeric);
}

impl PgType {
    /// Return `true` if this is an array type.
    pub const fn is_array(self) -> bool {
        self.elem().is_some()
    }

    /// The array type whose element is self. An array type returns itself.
    pub const fn to_array(self) -> PgType {
        match self {
            PgType::Bool => PgType::BoolArray,
            PgType::Bytea => PgType::ByteaArray,
            PgType::Char => PgType::CharArray,
            PgType::Int8 => PgType::Int8Array,
            PgType::Int2 => PgType::Int2Array,
            PgType::Int4 => PgType::Int4Array,
            PgType::Text => PgType::TextArray,
            PgType::Float4 => PgType::Float4Array,
            PgType::Float8 => PgType::Float8Array,
            PgType::Bpchar => PgType::BpcharArray,
            PgType::Varchar => PgType::VarcharArray,
            PgType::Date => PgType::DateArray,
            PgType::Timestamp => PgType::TimestampArray,
            PgType::Timestamptz => PgType::TimestamptzArray,
            PgType::Numeric => PgType::NumericArray,
            array => array,
        }
    }
}

/// The oid to codec table.
///
/// [`PgType::from_oid`] carries the fixed catalog entries; a driver layer
/// that knows more, domain types, user enums decoded as text, extends the
/// table here without owning it.
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    entries: Vec<(Oid, PgType)>,
}

impl TypeMap {
    /// An empty table, resolving only the fixed catalog entries.
    pub const fn new() -> TypeMap {
        TypeMap { entries: Vec::new() }
    }

    /// Register a codec for an oid, shadowing earlier entries.
    pub fn insert(&mut self, oid: Oid, ty: PgType) {
        self.entries.push((oid, ty));
    }

    /// Resolve an oid to its codec type.
    pub fn resolve(&self, oid: Oid) -> Option<PgType> {
        self.entries
            .iter()
            .rev()
            .find(|(o, _)| *o == oid)
            .map(|(_, ty)| *ty)
            .or_else(|| PgType::from_oid(oid))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ALL: &[PgType] = &[
        PgType::Bool, PgType::Bytea, PgType::Char, PgType::Int8, PgType::Int2,
        PgType::Int4, PgType::Text, PgType::Float4, PgType::Float8,
        PgType::Bpchar, PgType::Varchar, PgType::Date, PgType::Timestamp,
        PgType::Timestamptz, PgType::Numeric, PgType::BoolArray,
        PgType::ByteaArray, PgType::CharArray, PgType::Int8Array,
        PgType::Int2Array, PgType::Int4Array, PgType::TextArray,
        PgType::Float4Array, PgType::Float8Array, PgType::BpcharArray,
        PgType::VarcharArray, PgType::DateArray, PgType::TimestampArray,
        PgType::TimestamptzArray, PgType::NumericArray,
    ];

    #[test]
    fn oid_round_trip() {
        for &ty in ALL {
            assert_eq!(PgType::from_oid(ty.oid()), Some(ty), "{}", ty.name());
        }
    }

    #[test]
    fn elem_matches_to_array() {
        for &ty in ALL {
            match ty.elem() {
                Some(elem) => assert_eq!(elem.to_array(), ty),
                None => assert_eq!(ty.to_array().elem(), Some(ty)),
            }
        }
    }

    #[test]
    fn unknown_oid() {
        assert_eq!(PgType::from_oid(0), None);
        assert_eq!(PgType::from_oid(3802), None); // jsonb, not ours
    }

    #[test]
    fn type_map_shadowing() {
        let mut map = TypeMap::new();
        assert_eq!(map.resolve(25), Some(PgType::Text));
        assert_eq!(map.resolve(3802), None);

        map.insert(3802, PgType::Text);
        assert_eq!(map.resolve(3802), Some(PgType::Text));

        // later entries shadow, including fixed ones
        map.insert(25, PgType::Varchar);
        assert_eq!(map.resolve(25), Some(PgType::Varchar));
    }
}
