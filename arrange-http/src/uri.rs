use http::Uri;

/// Query string helpers for [`Uri`], handy in accept rules.
///
/// Only `name=value` pairs count as query parameters:
/// a bare `name` without `=` is ignored.
pub trait UriExt: private::Sealed {
    /// All query parameters, in order of appearance.
    fn query_pairs(&self) -> Vec<(String, String)>;

    /// The values of a query parameter joined with `,`,
    /// or `None` if the parameter is not present.
    fn query_value(&self, name: &str) -> Option<String>;

    /// The values of a query parameter, each value split on `,`.
    fn query_values(&self, name: &str) -> Vec<String>;

    /// Returns true if one of the values of the query parameter equals `expected`.
    fn query_value_contains(&self, name: &str, expected: &str) -> bool;
}

impl UriExt for Uri {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = self.query() else {
            return Vec::new();
        };
        let pairs: Vec<&str> = query
            .split('&')
            .filter(|pair| pair.contains('='))
            .collect();
        serde_html_form::from_str(&pairs.join("&")).unwrap_or_default()
    }

    fn query_value(&self, name: &str) -> Option<String> {
        let values: Vec<String> = self
            .query_pairs()
            .into_iter()
            .filter_map(|(key, value)| (key == name).then_some(value))
            .collect();
        (!values.is_empty()).then(|| values.join(","))
    }

    fn query_values(&self, name: &str) -> Vec<String> {
        self.query_value(name)
            .map(|joined| joined.split(',').map(ToOwned::to_owned).collect())
            .unwrap_or_default()
    }

    fn query_value_contains(&self, name: &str, expected: &str) -> bool {
        self.query_values(name).iter().any(|value| value == expected)
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for http::Uri {}
}
