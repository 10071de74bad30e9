use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::TemplateRenderError;

/// Escapes a string for output.
pub type EscapeFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Default escaping: `&`, `<`, `>` and `"`. Single quotes are kept.
#[must_use]
pub fn html_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Template variables, escaped on read unless asked for raw.
///
/// Only string values are escaped; numbers, booleans, arrays and objects come
/// back as stored.
#[derive(Clone)]
pub struct ViewVars {
    vars: BTreeMap<String, Value>,
    escape: EscapeFn,
}

impl Default for ViewVars {
    fn default() -> Self {
        Self {
            vars: BTreeMap::new(),
            escape: Arc::new(html_escape),
        }
    }
}

impl fmt::Debug for ViewVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.vars.iter()).finish()
    }
}

impl PartialEq for ViewVars {
    fn eq(&self, other: &Self) -> bool {
        self.vars == other.vars
    }
}

impl ViewVars {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Escaped value of `name`.
    ///
    /// # Errors
    ///
    /// [`TemplateRenderError::UndefinedVariable`] if `name` is not set.
    pub fn get(&self, name: &str) -> Result<Value, TemplateRenderError> {
        self.get_escaped(name)
            .ok_or_else(|| TemplateRenderError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    #[must_use]
    pub fn get_escaped(&self, name: &str) -> Option<Value> {
        self.vars.get(name).map(|value| self.escape_value(value))
    }

    #[must_use]
    pub fn get_raw(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Copy every variable of `other` over this set.
    pub fn merge(&mut self, other: &ViewVars) {
        self.vars
            .extend(other.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }

    pub fn set_escape_callback(&mut self, escape: EscapeFn) {
        self.escape = escape;
    }

    #[must_use]
    pub fn escape_callback(&self) -> EscapeFn {
        Arc::clone(&self.escape)
    }

    #[must_use]
    pub fn escape(&self, value: &str) -> String {
        (self.escape)(value)
    }

    fn escape_value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.escape(s)),
            other => other.clone(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ViewVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = ViewVars::new();
        for (k, v) in iter {
            vars.set(k, v);
        }
        vars
    }
}

/// A controller's request to render a template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    /// Variables handed to the template.
    pub vars: ViewVars,
    /// Template name; the routed action name when unset.
    pub template: Option<String>,
    /// Layout name; overrides the configured one and enables the layout.
    pub layout: Option<String>,
    /// Force the layout on or off; the configured default when unset.
    pub layout_enabled: Option<bool>,
}

impl ViewModel {
    #[must_use]
    pub fn new(vars: ViewVars) -> Self {
        Self {
            vars,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Use `layout` and turn the layout on.
    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self.layout_enabled = Some(true);
        self
    }

    #[must_use]
    pub fn without_layout(mut self) -> Self {
        self.layout_enabled = Some(false);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_escapes_strings_only() {
        let vars = ViewVars::new()
            .with("title", "<b>\"Tom\" & 'Jerry'</b>")
            .with("count", 3);
        assert_eq!(
            vars.get("title").unwrap(),
            json!("&lt;b&gt;&quot;Tom&quot; &amp; 'Jerry'&lt;/b&gt;")
        );
        assert_eq!(vars.get("count").unwrap(), json!(3));
        assert_eq!(vars.get_raw("title"), Some(&json!("<b>\"Tom\" & 'Jerry'</b>")));
    }

    #[test]
    fn test_missing_variable() {
        let vars = ViewVars::new();
        assert_eq!(
            vars.get("nope").unwrap_err(),
            TemplateRenderError::UndefinedVariable {
                name: "nope".to_string()
            }
        );
        assert!(vars.get_escaped("nope").is_none());
        assert!(vars.get_raw("nope").is_none());
    }

    #[test]
    fn test_custom_escape_callback() {
        let mut vars = ViewVars::new().with("name", "abc");
        vars.set_escape_callback(Arc::new(|s: &str| s.to_uppercase()));
        assert_eq!(vars.get("name").unwrap(), json!("ABC"));
    }

    #[test]
    fn test_merge_overrides() {
        let mut vars: ViewVars = [("a", "1"), ("b", "2")].into_iter().collect();
        vars.merge(&ViewVars::new().with("b", "3").with("c", "4"));
        assert_eq!(vars.len(), 3);
        assert_eq!(vars.get_raw("b"), Some(&json!("3")));
        assert!(vars.contains("c"));
    }
}
