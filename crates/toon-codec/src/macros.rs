/// Build a [`Value`](crate::Value) from a JSON-like literal.
///
/// ```rust
/// use toon_codec::{toon, Value};
///
/// let v = toon!({
///     "name": "Alice",
///     "scores": [95, 87, 92],
///     "active": true,
///     "extra": null
/// });
/// assert!(v.is_object());
/// ```
#[macro_export]
macro_rules! toon {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($element:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toon!($element)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ToonMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ToonMap::new();
        $(
            object.insert($key.to_string(), $crate::toon!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
