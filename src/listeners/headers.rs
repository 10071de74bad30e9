use std::collections::BTreeMap;

use crate::events::{Listener, ResponseFilterEvent};

/// Adds configured headers to every response that does not set them itself.
#[derive(Debug, Clone, Default)]
pub struct DefaultHeadersListener {
    headers: Vec<(String, String)>,
}

impl DefaultHeadersListener {
    #[must_use]
    pub fn new(headers: &BTreeMap<String, String>) -> Self {
        Self {
            headers: headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Listener for DefaultHeadersListener {
    fn on_filter_response(&self, event: &mut ResponseFilterEvent<'_>) -> anyhow::Result<()> {
        let response = event.response_mut();
        for (name, value) in &self.headers {
            if response.get_header(name).is_none() {
                response.set_header(name, value.as_str());
            }
        }
        Ok(())
    }
}
