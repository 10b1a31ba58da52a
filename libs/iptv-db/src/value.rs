//! Request values bound to statements exactly as they arrived.

use serde_json::Value;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::{Database, Encode, Type};

/// Binds a JSON value as the nearest SQLite primitive: strings as TEXT,
/// integers as INTEGER, other numbers as REAL, booleans as 0/1 and null as
/// NULL. Arrays and objects go in as their JSON text. The column affinity
/// decides what ends up stored, so `"50"` added to a REAL column adds 50.
#[derive(Debug, Clone, Copy)]
pub struct Loose<'a>(pub &'a Value);

impl Type<Sqlite> for Loose<'_> {
    fn type_info() -> SqliteTypeInfo {
        <str as Type<Sqlite>>::type_info()
    }

    fn compatible(_: &SqliteTypeInfo) -> bool {
        true
    }
}

impl<'q> Encode<'q, Sqlite> for Loose<'_> {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self.0 {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => <bool as Encode<'q, Sqlite>>::encode_by_ref(b, buf),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => <i64 as Encode<'q, Sqlite>>::encode_by_ref(&i, buf),
                (None, Some(f)) => <f64 as Encode<'q, Sqlite>>::encode_by_ref(&f, buf),
                (None, None) => <String as Encode<'q, Sqlite>>::encode(n.to_string(), buf),
            },
            Value::String(s) => <String as Encode<'q, Sqlite>>::encode(s.clone(), buf),
            other => <String as Encode<'q, Sqlite>>::encode(other.to_string(), buf),
        }
    }
}
