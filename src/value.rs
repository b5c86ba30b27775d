/// Query parameter value.
///
/// Lists are sent as repeated `key=value` pairs, not as JSON.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<QueryValue>),
}

impl QueryValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn integer(value: i64) -> Self {
        Self::Integer(value)
    }

    pub fn float(value: f64) -> Self {
        Self::Float(value)
    }

    pub fn bool(value: bool) -> Self {
        Self::Bool(value)
    }

    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<QueryValue>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    pub(crate) fn push_pairs(&self, key: &str, out: &mut Vec<(String, String)>) {
        let scalar = match self {
            Self::Text(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
            Self::List(values) => {
                for value in values {
                    value.push_pairs(key, out);
                }
                return;
            }
        };
        out.push((key.to_owned(), scalar));
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<V: Into<QueryValue>> From<Vec<V>> for QueryValue {
    fn from(values: Vec<V>) -> Self {
        Self::list(values)
    }
}

impl<V: Into<QueryValue>, const N: usize> From<[V; N]> for QueryValue {
    fn from(values: [V; N]) -> Self {
        Self::list(values)
    }
}
