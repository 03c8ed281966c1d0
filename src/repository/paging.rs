//! Page and sort parameters of collection resources.
//!
//! Query string shape: `?page=0&size=20&sort=name,desc&sort=id`. `page` is
//! zero-based. Sort properties are the JSON names of a resource and are mapped
//! to columns through a per-resource whitelist, so nothing from the request is
//! ever spliced into SQL.

use serde::Serialize;

use crate::config::RestConfig;
use crate::error::{AppError, AppResult};

/// JSON property name to column name.
pub type SortColumns = &'static [(&'static str, &'static str)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub column: &'static str,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
    /// The `sort` values as received, replayed in navigation links.
    pub sort_params: Vec<String>,
}

impl PageRequest {
    /// Parses the raw query string of a collection request.
    ///
    /// Unparseable or negative `page` falls back to 0, unparseable or
    /// non-positive `size` to the configured default; `size` is clamped to the
    /// configured maximum. An unknown sort property is a bad request.
    pub fn from_query(query: Option<&str>, rest: &RestConfig, columns: SortColumns) -> AppResult<Self> {
        let mut page = 0u32;
        let mut size = rest.default_page_size;
        let mut sort = Vec::new();
        let mut sort_params = Vec::new();

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match &*key {
                "page" => {
                    page = value.trim().parse::<i64>().ok().filter(|p| *p >= 0).map_or(0, |p| {
                        u32::try_from(p).unwrap_or(u32::MAX)
                    });
                }
                "size" => {
                    size = match value.trim().parse::<i64>() {
                        Ok(s) if s > 0 => u32::try_from(s).unwrap_or(u32::MAX).min(rest.max_page_size),
                        _ => rest.default_page_size,
                    };
                }
                "sort" => {
                    if parse_sort(&value, columns, &mut sort)? {
                        sort_params.push(value.into_owned());
                    }
                }
                _ => {}
            }
        }

        Ok(Self { page, size, sort, sort_params })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// `ORDER BY` clause built from whitelisted columns, with `id` as the final
    /// tie breaker so that pages are stable.
    pub fn order_by(&self) -> String {
        let mut parts: Vec<String> =
            self.sort.iter().map(|o| format!("{} {}", o.column, o.direction.as_sql())).collect();
        if !self.sort.iter().any(|o| o.column == "id") {
            parts.push("id ASC".to_string());
        }
        format!("ORDER BY {}", parts.join(", "))
    }
}

/// Parses one `sort` value (`prop[,prop...][,asc|desc]`) into `out`.
/// Returns whether anything was added.
fn parse_sort(value: &str, columns: SortColumns, out: &mut Vec<SortOrder>) -> AppResult<bool> {
    let mut tokens: Vec<&str> = value.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();
    let direction = match tokens.last().map(|t| t.to_ascii_lowercase()) {
        Some(t) if t == "asc" => {
            tokens.pop();
            Direction::Asc
        }
        Some(t) if t == "desc" => {
            tokens.pop();
            Direction::Desc
        }
        _ => Direction::Asc,
    };

    let before = out.len();
    for property in tokens {
        let column = columns
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, column)| *column)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown sort property '{}'", property)))?;
        out.push(SortOrder { column, direction });
    }
    Ok(out.len() > before)
}

/// One page of a collection.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        Self { items, number: request.page, size: request.size, total_elements }
    }

    pub fn total_pages(&self) -> i64 {
        if self.size == 0 {
            return 0;
        }
        let size = i64::from(self.size);
        (self.total_elements + size - 1) / size
    }

    pub fn metadata(&self) -> PageMetadata {
        PageMetadata {
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages(),
            number: self.number,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

/// The `page` object of a paged collection body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
    pub number: u32,
}
