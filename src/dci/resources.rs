use std::fmt;

/// Collections exposed by the DCI v1 API that this crate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Pipelines,
    Components,
    Jobs,
    Teams,
}

impl Resource {
    /// URL path segment of the collection (e.g. `pipelines`).
    pub fn path(self) -> &'static str {
        match self {
            Self::Pipelines => "pipelines",
            Self::Components => "components",
            Self::Jobs => "jobs",
            Self::Teams => "teams",
        }
    }

    /// Key under which a single entity is wrapped (e.g. `{"pipeline": {...}}`).
    pub fn singular_key(self) -> &'static str {
        match self {
            Self::Pipelines => "pipeline",
            Self::Components => "component",
            Self::Jobs => "job",
            Self::Teams => "team",
        }
    }

    /// Key under which list responses carry their items.
    pub fn plural_key(self) -> &'static str {
        self.path()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular_key())
    }
}

/// Pagination, filter and sort parameters of a list call.
///
/// `where_`, `query` and `sort` use the server's own expression syntax and
/// are forwarded verbatim. `query` is the nested DSL
/// (`and(eq(name,DCI),contains(tags,ga))`), `where_` the flat `field:value` form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub where_: Option<String>,
    pub query: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    /// Query pairs for the request, skipping unset parameters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(where_) = &self.where_ {
            pairs.push(("where", where_.clone()));
        }
        if let Some(query) = &self.query {
            pairs.push(("query", query.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs
    }
}
