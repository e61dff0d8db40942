//! Route-template table using a radix tree (matchit)
//!
//! Routing proper is the surrounding pipeline's job; the dispatcher only
//! needs the matched route template. This table is the small piece of that
//! collaborator the server loop and test client use to hand the dispatcher
//! a template plus the matched path parameters.
//!
//! Templates use `{param}` syntax:
//!
//! - `/api/products` - Static path
//! - `/api/{version}/customers` - Version-carrying segment

use std::collections::HashMap;

/// Error raised while building the route table. Startup-fatal.
#[derive(Debug, thiserror::Error)]
pub enum RouteTableError {
    /// Two templates overlap in a way matchit cannot disambiguate.
    #[error("route template {template:?} conflicts with an existing route: {details}")]
    Conflict {
        /// The template being inserted.
        template: String,
        /// Detailed error message from the underlying router.
        details: String,
    },
}

/// A matched path: the registered template plus its extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHit {
    /// The route template as it was registered, `{param}` syntax.
    pub template: String,
    /// Matched path parameters by name.
    pub params: HashMap<String, String>,
}

/// Maps request paths to registered route templates.
pub struct RouteTable {
    inner: matchit::Router<String>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            inner: matchit::Router::new(),
        }
    }

    /// Register a route template.
    pub fn insert(&mut self, template: &str) -> Result<(), RouteTableError> {
        let matchit_path = convert_path_params(template);
        self.inner
            .insert(matchit_path, template.to_string())
            .map_err(|e| RouteTableError::Conflict {
                template: template.to_string(),
                details: e.to_string(),
            })
    }

    /// Build a table holding every given template.
    pub fn from_templates<'a, I>(templates: I) -> Result<Self, RouteTableError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut table = Self::new();
        for template in templates {
            table.insert(template)?;
        }
        Ok(table)
    }

    /// Match a request path against the registered templates.
    pub fn match_path(&self, path: &str) -> Option<RouteHit> {
        let matched = self.inner.at(path).ok()?;
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Some(RouteHit {
            template: matched.value.clone(),
            params,
        })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert {param} style to :param for matchit
fn convert_path_params(path: &str) -> String {
    let mut result = String::with_capacity(path.len());

    for ch in path.chars() {
        match ch {
            '{' => {
                result.push(':');
            }
            '}' => {
                // Skip closing brace
            }
            _ => {
                result.push(ch);
            }
        }
    }

    result
}
