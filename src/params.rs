use crate::QueryValue;

/// Ordered query parameters for one request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pairs: Vec<(String, QueryValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Appends a parameter only when `value` is `Some`.
    pub fn with_opt<V: Into<QueryValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Flattens lists into repeated pairs, ready for URL encoding.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.pairs.len());
        for (key, value) in &self.pairs {
            value.push_pairs(key, &mut out);
        }
        out
    }
}

impl From<()> for Query {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl<K, V> From<Vec<(K, V)>> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from(Vec::from(pairs))
    }
}

impl From<Option<Query>> for Query {
    fn from(query: Option<Query>) -> Self {
        query.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Query, QueryValue};

    #[test]
    fn unit_is_empty_query() {
        let query: Query = ().into();
        assert!(query.is_empty());
    }

    #[test]
    fn optional_values_are_skipped() {
        let query = Query::new()
            .with("limit", 200u32)
            .with_opt("search", None::<&str>)
            .with_opt("board", Some("42"));
        assert_eq!(
            query.to_pairs(),
            vec![
                ("limit".to_owned(), "200".to_owned()),
                ("board".to_owned(), "42".to_owned()),
            ]
        );
    }

    #[test]
    fn array_of_pairs_keeps_order_and_repeats_lists() {
        let query = Query::from([
            ("only", QueryValue::list(["id", "title"])),
            ("offset", QueryValue::integer(0)),
        ]);
        assert_eq!(
            query.to_pairs(),
            vec![
                ("only".to_owned(), "id".to_owned()),
                ("only".to_owned(), "title".to_owned()),
                ("offset".to_owned(), "0".to_owned()),
            ]
        );
    }
}
