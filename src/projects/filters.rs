// src/projects/filters.rs
//! Query-string filters for project listings.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

/// Raw query-string parameters accepted by the project list endpoint.
/// Unknown keys are ignored; absent keys impose no restriction.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub is_active: Option<bool>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Validated filter set, ready to be pushed onto a query.
#[derive(Debug, Default, Clone)]
pub struct ProjectFilter {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub is_active: Option<bool>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub search: Option<String>,
    ordering: Option<&'static str>,
}

const DEFAULT_ORDERING: &str = "p.created_at DESC";

fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering {
        Some("name") => "p.name ASC",
        Some("-name") => "p.name DESC",
        Some("created_at") => "p.created_at ASC",
        Some("-created_at") => "p.created_at DESC",
        Some("updated_at") => "p.updated_at ASC",
        Some("-updated_at") => "p.updated_at DESC",
        // Anything outside the allow-list falls back to the default.
        _ => DEFAULT_ORDERING,
    }
}

impl ProjectFilter {
    pub fn from_query(query: &ProjectQuery) -> Self {
        Self {
            name: query.name.clone(),
            owner: query.owner.clone(),
            is_active: query.is_active,
            created_after: query.created_after,
            created_before: query.created_before,
            search: query.search.clone(),
            ordering: Some(order_clause(query.ordering.as_deref())),
        }
    }

    /// Append every supplied predicate as an AND clause.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        if let Some(name) = &self.name {
            let pattern = format!("%{}%", name.to_lowercase());
            qb.push(" AND lower(p.name) LIKE ").push_bind(pattern);
        }
        if let Some(owner) = &self.owner {
            qb.push(" AND p.owner_id = ").push_bind(owner.clone());
        }
        if let Some(is_active) = self.is_active {
            qb.push(" AND p.is_active = ").push_bind(is_active);
        }
        if let Some(created_after) = self.created_after {
            qb.push(" AND p.created_at >= ")
                .push_bind(created_after.naive_utc());
        }
        if let Some(created_before) = self.created_before {
            qb.push(" AND p.created_at <= ")
                .push_bind(created_before.naive_utc());
        }
        if let Some(search) = &self.search {
            let pattern = format!("%{}%", search.to_lowercase());
            qb.push(" AND (lower(p.name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR lower(p.description) LIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    pub fn order_by(&self) -> &'static str {
        self.ordering.unwrap_or(DEFAULT_ORDERING)
    }
}
