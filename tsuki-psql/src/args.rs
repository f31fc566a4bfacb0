use serde_json::Value;
use sqlx::{
    postgres::{PgArguments, Postgres},
    query::Query,
};
use time::OffsetDateTime;

/// A positional statement parameter.
///
/// Every variant is nullable so that `NULL` is still sent with a concrete type
/// which postgres needs to infer the parameter type.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlArg {
    Bool(Option<bool>),
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
    Bytes(Option<Vec<u8>>),
    Json(Option<Value>),
    Timestamp(Option<OffsetDateTime>),
}

impl SqlArg {
    pub(crate) fn bind<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            Self::Bool(v) => query.bind(*v),
            Self::Int(v) => query.bind(*v),
            Self::Float(v) => query.bind(*v),
            Self::Text(v) => query.bind(v.clone()),
            Self::Bytes(v) => query.bind(v.clone()),
            Self::Json(v) => query.bind(v.clone()),
            Self::Timestamp(v) => query.bind(*v),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Self::Bool(v) => v.is_none(),
            Self::Int(v) => v.is_none(),
            Self::Float(v) => v.is_none(),
            Self::Text(v) => v.is_none(),
            Self::Bytes(v) => v.is_none(),
            Self::Json(v) => v.is_none(),
            Self::Timestamp(v) => v.is_none(),
        }
    }
}

/// Binds all arguments in order.
pub(crate) fn bind_all<'q>(sql: &'q str, args: &[SqlArg]) -> Query<'q, Postgres, PgArguments> {
    args.iter()
        .fold(sqlx::query(sql), |query, arg| arg.bind(query))
}

macro_rules! sql_arg_from {
    ($($ty:ty => $variant:ident $( as $cast:ty )?,)*) => {
        $(
            impl From<$ty> for SqlArg {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(Some(value $( as $cast )?))
                }
            }

            impl From<Option<$ty>> for SqlArg {
                #[inline]
                fn from(value: Option<$ty>) -> Self {
                    Self::$variant(value.map(|value| value $( as $cast )?))
                }
            }
        )*
    };
}

sql_arg_from! {
    bool => Bool,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int,
    u32 => Int as i64,
    f32 => Float as f64,
    f64 => Float,
    String => Text,
    Vec<u8> => Bytes,
    Value => Json,
    OffsetDateTime => Timestamp,
}

impl From<&str> for SqlArg {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Text(Some(value.to_owned()))
    }
}

impl From<Option<&str>> for SqlArg {
    #[inline]
    fn from(value: Option<&str>) -> Self {
        Self::Text(value.map(str::to_owned))
    }
}

/// Collects any amount of values into a `Vec<SqlArg>`.
#[macro_export]
macro_rules! sql_args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::SqlArg::from($arg)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(SqlArg::from(42_i32), SqlArg::Int(Some(42)));
        assert_eq!(SqlArg::from(1.5_f32), SqlArg::Float(Some(1.5)));
        assert_eq!(SqlArg::from("tsuki"), SqlArg::Text(Some("tsuki".to_owned())));
        assert_eq!(SqlArg::from(None::<i64>), SqlArg::Int(None));
        assert!(SqlArg::from(None::<&str>).is_null());
        assert!(!SqlArg::from(true).is_null());
    }

    #[test]
    fn args_macro() {
        let args = crate::sql_args![1_i64, "name", None::<bool>];

        assert_eq!(
            args,
            [
                SqlArg::Int(Some(1)),
                SqlArg::Text(Some("name".to_owned())),
                SqlArg::Bool(None),
            ]
        );
    }
}
