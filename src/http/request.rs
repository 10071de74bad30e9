use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use http::Method;
use smallvec::SmallVec;

use crate::ids::{RequestId, REQUEST_ID_HEADER};

/// Module name used when neither the route nor the request names one.
pub const DEFAULT_MODULE: &str = "default";
/// Controller name used when neither the route nor the request names one.
pub const DEFAULT_CONTROLLER: &str = "index";
/// Action name used when neither the route nor the request names one.
pub const DEFAULT_ACTION: &str = "index";

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage shared by [`Request`] and [`Response`](super::Response).
///
/// Names are `Arc<str>` since they repeat across requests; values are per request.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Generic request parameters, ordered by name.
pub type Params = BTreeMap<String, String>;

/// The request travelling through the kernel pipeline.
///
/// Created once per incoming call and mutated in place: the matching route
/// writes the module/controller/action identity and the merged parameters
/// onto it, controllers and the view layer read them back.
#[derive(Debug, Clone)]
pub struct Request {
    request_id: RequestId,
    method: Method,
    request_uri: String,
    base_url: String,
    server_name: Option<String>,
    secure: bool,
    headers: HeaderVec,
    module_name: String,
    controller_name: String,
    action_name: String,
    params: Params,
}

impl Request {
    /// Create a request for `request_uri` with base URL `/` and the default identity.
    #[must_use]
    pub fn new(method: Method, request_uri: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            request_uri: request_uri.into(),
            base_url: "/".to_string(),
            server_name: None,
            secure: false,
            headers: HeaderVec::new(),
            module_name: DEFAULT_MODULE.to_string(),
            controller_name: DEFAULT_CONTROLLER.to_string(),
            action_name: DEFAULT_ACTION.to_string(),
            params: Params::new(),
        }
    }

    /// Shorthand for a `GET` request.
    #[must_use]
    pub fn get(request_uri: impl Into<String>) -> Self {
        Self::new(Method::GET, request_uri)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Derive the base URL from the executing script path, see [`derive_base_url`].
    #[must_use]
    pub fn with_script_name(mut self, script_name: &str) -> Self {
        self.base_url = derive_base_url(&self.request_uri, Some(script_name));
        self
    }

    /// Derive the base URL from the request URI itself, see [`derive_base_url`].
    #[must_use]
    pub fn with_derived_base_url(mut self) -> Self {
        self.base_url = derive_base_url(&self.request_uri, None);
        self
    }

    /// Add a header. A valid `x-request-id` header replaces the generated id.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if name.eq_ignore_ascii_case(REQUEST_ID_HEADER) {
            self.request_id = RequestId::from_header_or_new(Some(&value));
        }
        self.headers.push((Arc::from(name), value));
        self
    }

    #[must_use]
    pub fn with_server_name(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = Some(server_name.into());
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    #[inline]
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The raw request URI, including query string and fragment.
    #[inline]
    #[must_use]
    pub fn request_uri(&self) -> &str {
        &self.request_uri
    }

    pub fn set_request_uri(&mut self, request_uri: impl Into<String>) {
        self.request_uri = request_uri.into();
    }

    /// The request URI without query string and fragment.
    #[must_use]
    pub fn path(&self) -> &str {
        let end = self
            .request_uri
            .find(['?', '#'])
            .unwrap_or(self.request_uri.len());
        &self.request_uri[..end]
    }

    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    /// Query string: the text between the first `?` and the first `#`.
    ///
    /// A `#` before any `?` means there is no query string at all.
    #[must_use]
    pub fn query(&self) -> &str {
        let uri = self.request_uri.as_str();
        let fragment_start = uri.find('#').unwrap_or(uri.len());
        match uri[..fragment_start].find('?') {
            Some(pos) => &uri[pos + 1..fragment_start],
            None => "",
        }
    }

    /// Fragment: everything after the first `#`.
    #[must_use]
    pub fn fragment(&self) -> &str {
        self.request_uri
            .find('#')
            .map(|pos| &self.request_uri[pos + 1..])
            .unwrap_or("")
    }

    /// Decoded query string parameters. Later duplicates win.
    #[must_use]
    pub fn query_params(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(self.query().as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Host from the `Host` header, falling back to the configured server name.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.get_header("host").or(self.server_name.as_deref())
    }

    #[must_use]
    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// Get a header by name (case-insensitive).
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn set_module_name(&mut self, name: impl Into<String>) {
        self.module_name = name.into();
    }

    #[inline]
    #[must_use]
    pub fn controller_name(&self) -> &str {
        &self.controller_name
    }

    pub fn set_controller_name(&mut self, name: impl Into<String>) {
        self.controller_name = name.into();
    }

    #[inline]
    #[must_use]
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    pub fn set_action_name(&mut self, name: impl Into<String>) {
        self.action_name = name.into();
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }
}

/// Compute the base URL of a request.
///
/// Uses the script name when given, otherwise the request URI with query
/// string and fragment removed, and keeps everything up to and including the
/// last `/`.
///
/// ```
/// use routekernel::http::derive_base_url;
///
/// assert_eq!(derive_base_url("/test/abc/123/test.php", None), "/test/abc/123/");
/// assert_eq!(derive_base_url("/test/abc/123?x=1", None), "/test/abc/");
/// assert_eq!(derive_base_url("/test/abc/123/", Some("/test/abc/test.php")), "/test/abc/");
/// ```
#[must_use]
pub fn derive_base_url(request_uri: &str, script_name: Option<&str>) -> String {
    let source = match script_name {
        Some(script) => script,
        None => {
            let end = request_uri.find(['?', '#']).unwrap_or(request_uri.len());
            &request_uri[..end]
        }
    };
    match source.rfind('/') {
        Some(pos) => source[..=pos].to_string(),
        None => "/".to_string(),
    }
}
