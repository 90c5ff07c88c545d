//! Search query expressions.

/// Search parameters for the `/search` operation.
///
/// All fields are optional; `max_items` and `skip_count` treat `0` as unset,
/// indistinguishable from absent. Absent fields are omitted from the built
/// query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryExpression {
    path: Option<String>,
    name: Option<String>,
    text: Option<String>,
    max_items: u32,
    skip_count: u32,
}

impl QueryExpression {
    /// Create an empty query expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the search to a virtual filesystem subtree.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Filter results by item name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Filter results by file content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Cap the number of returned items (`0` = unset).
    pub fn with_max_items(mut self, max_items: u32) -> Self {
        self.max_items = max_items;
        self
    }

    /// Skip the first `skip_count` results (`0` = unset).
    pub fn with_skip_count(mut self, skip_count: u32) -> Self {
        self.skip_count = skip_count;
        self
    }

    /// The subtree restriction, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Serialize the present parameters into a query string.
    ///
    /// Parameters appear in fixed order (name, text, maxItems, skipCount)
    /// joined with `&`, prefixed with `?` when any are present. Empty strings
    /// and zero counts are omitted.
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();

        if let Some(name) = self.name.as_deref() {
            if !name.is_empty() {
                params.push(format!("name={}", name));
            }
        }
        if let Some(text) = self.text.as_deref() {
            if !text.is_empty() {
                params.push(format!("text={}", text));
            }
        }
        if self.max_items != 0 {
            params.push(format!("maxItems={}", self.max_items));
        }
        if self.skip_count != 0 {
            params.push(format!("skipCount={}", self.skip_count));
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}
