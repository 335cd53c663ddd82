//! Owner-scoped listing engine
//!
//! Search, filters, sorting, and pagination over one owner's records. The
//! owner-equality predicate is assembled first and cannot be overridden by
//! any parameter; it is the sole tenancy isolation mechanism.

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use utoipa::ToSchema;

use super::models::Student;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw listing parameters as they arrive on the query string.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub course: Option<String>,
    pub city: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryParamError {
    #[error("page must be >= 1")]
    PageOutOfRange,

    #[error("page_size must be between 1 and 100")]
    PageSizeOutOfRange,
}

/// Sortable columns. Anything outside the fixed set falls back to
/// `CreatedAt` silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Email,
    Age,
    Course,
    City,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("name") => Self::Name,
            Some("email") => Self::Email,
            Some("age") => Self::Age,
            Some("course") => Self::Course,
            Some("city") => Self::City,
            Some("created_at") => Self::CreatedAt,
            Some("updated_at") => Self::UpdatedAt,
            _ => Self::CreatedAt,
        }
    }

    /// Fixed column table; never interpolates caller input into SQL.
    fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
            Self::Course => "course",
            Self::City => "city",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction. "asc" in any case sorts ascending; anything else,
/// including absence, sorts descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Validated, defaulted form of [`ListParams`].
#[derive(Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub course: Option<String>,
    pub city: Option<String>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub page: u32,
    pub page_size: u32,
}

/// Blank or whitespace-only terms behave as if the parameter was absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ListQuery {
    /// Apply defaults, the sort fallback rules, and paging bounds.
    pub fn from_params(params: ListParams) -> Result<Self, QueryParamError> {
        let page = params.page.unwrap_or(1);
        if page < 1 {
            return Err(QueryParamError::PageOutOfRange);
        }

        let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(QueryParamError::PageSizeOutOfRange);
        }

        Ok(Self {
            search: non_blank(params.search),
            course: non_blank(params.course),
            city: non_blank(params.city),
            sort_field: SortField::parse(params.sort_by.as_deref()),
            sort_order: SortOrder::parse(params.sort_order.as_deref()),
            page,
            page_size,
        })
    }

    /// Zero-indexed row offset of the requested page.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }
}

/// Total pages for a result set, with a floor of one page: an empty result
/// still reports exactly one page.
pub fn total_pages(total: i64, page_size: u32) -> u32 {
    if total <= 0 {
        return 1;
    }
    let size = i64::from(page_size);
    ((total + size - 1) / size) as u32
}

/// Wrap a user term for ILIKE substring matching, escaping the pattern
/// metacharacters so the match is a literal substring.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// One page of students plus the counts the caller needs to page further.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentPage {
    pub students: Vec<Student>,
    #[schema(example = 42)]
    pub total: i64,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub page_size: u32,
    #[schema(example = 5)]
    pub total_pages: u32,
}

/// A field with a distinct-values listing.
#[derive(Debug, Clone, Copy)]
pub enum DistinctField {
    Course,
    City,
}

impl DistinctField {
    fn column(self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::City => "city",
        }
    }
}

const STUDENT_COLUMNS: &str =
    "id, name, email, age, course, city, owner_id, created_at, updated_at";

/// Append the combined predicate: owner equality always first, then the
/// optional search OR-block, then course/city AND filters.
fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, owner_id: i64, query: &ListQuery) {
    builder.push(" WHERE owner_id = ").push_bind(owner_id);

    if let Some(ref term) = query.search {
        let pattern = like_pattern(term);
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR course ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR city ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(ref course) = query.course {
        builder
            .push(" AND course ILIKE ")
            .push_bind(like_pattern(course));
    }

    if let Some(ref city) = query.city {
        builder
            .push(" AND city ILIKE ")
            .push_bind(like_pattern(city));
    }
}

/// Query engine over the students table.
pub struct StudentQuery;

impl StudentQuery {
    /// Deterministic, paginated, filtered, sorted view of one owner's
    /// records plus counts. `total` is computed under the identical
    /// predicate before pagination.
    pub async fn list(
        pool: &PgPool,
        owner_id: i64,
        query: &ListQuery,
    ) -> Result<StudentPage, sqlx::Error> {
        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM students");
        push_predicate(&mut count_builder, owner_id, query);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(pool)
            .await?;

        let mut builder =
            QueryBuilder::new(format!("SELECT {STUDENT_COLUMNS} FROM students"));
        push_predicate(&mut builder, owner_id, query);
        builder
            .push(" ORDER BY ")
            .push(query.sort_field.column())
            .push(" ")
            .push(query.sort_order.sql())
            // Stable tiebreaker: equal sort keys must not let rows drift
            // across page boundaries between requests.
            .push(", id ")
            .push(query.sort_order.sql())
            .push(" LIMIT ")
            .push_bind(i64::from(query.page_size))
            .push(" OFFSET ")
            .push_bind(query.offset());

        let students = builder.build_query_as::<Student>().fetch_all(pool).await?;

        Ok(StudentPage {
            students,
            total,
            page: query.page,
            page_size: query.page_size,
            total_pages: total_pages(total, query.page_size),
        })
    }

    /// Every owned record, newest first. No filtering, no paging.
    pub async fn list_all(pool: &PgPool, owner_id: i64) -> Result<Vec<Student>, sqlx::Error> {
        sqlx::query_as::<_, Student>(
            r#"SELECT id, name, email, age, course, city, owner_id, created_at, updated_at
               FROM students WHERE owner_id = $1
               ORDER BY created_at DESC, id DESC"#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Unique values of `field` among the owner's records.
    pub async fn distinct_values(
        pool: &PgPool,
        owner_id: i64,
        field: DistinctField,
    ) -> Result<Vec<String>, sqlx::Error> {
        let mut builder = QueryBuilder::new("SELECT DISTINCT ");
        builder
            .push(field.column())
            .push(" FROM students WHERE owner_id = ")
            .push_bind(owner_id);
        builder.build_query_scalar().fetch_all(pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_parses_known_names() {
        assert_eq!(SortField::parse(Some("name")), SortField::Name);
        assert_eq!(SortField::parse(Some("email")), SortField::Email);
        assert_eq!(SortField::parse(Some("age")), SortField::Age);
        assert_eq!(SortField::parse(Some("course")), SortField::Course);
        assert_eq!(SortField::parse(Some("city")), SortField::City);
        assert_eq!(SortField::parse(Some("created_at")), SortField::CreatedAt);
        assert_eq!(SortField::parse(Some("updated_at")), SortField::UpdatedAt);
    }

    #[test]
    fn unknown_sort_field_falls_back_to_created_at() {
        assert_eq!(SortField::parse(Some("bogus")), SortField::CreatedAt);
        assert_eq!(SortField::parse(Some("NAME")), SortField::CreatedAt);
        assert_eq!(SortField::parse(Some("")), SortField::CreatedAt);
        assert_eq!(SortField::parse(None), SortField::CreatedAt);
    }

    #[test]
    fn sort_order_defaults_to_descending() {
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(None), SortOrder::Desc);
    }

    #[test]
    fn total_pages_has_a_one_page_floor() {
        // total_pages == max(1, ceil(total / page_size)) across the grid.
        for page_size in 1..=25u32 {
            for total in 0..=250i64 {
                let expected = if total == 0 {
                    1
                } else {
                    ((total as f64) / (page_size as f64)).ceil() as u32
                };
                assert_eq!(
                    total_pages(total, page_size),
                    expected.max(1),
                    "total={} page_size={}",
                    total,
                    page_size
                );
            }
        }
    }

    #[test]
    fn offset_is_zero_indexed() {
        let query = ListQuery::from_params(ListParams {
            page: Some(3),
            page_size: Some(10),
            ..ListParams::default()
        })
        .unwrap();
        assert_eq!(query.offset(), 20);

        let first = ListQuery::from_params(ListParams::default()).unwrap();
        assert_eq!(first.offset(), 0);
    }

    #[test]
    fn paging_bounds_are_enforced() {
        let zero_page = ListParams {
            page: Some(0),
            ..ListParams::default()
        };
        assert_eq!(
            ListQuery::from_params(zero_page),
            Err(QueryParamError::PageOutOfRange)
        );

        let zero_size = ListParams {
            page_size: Some(0),
            ..ListParams::default()
        };
        assert_eq!(
            ListQuery::from_params(zero_size),
            Err(QueryParamError::PageSizeOutOfRange)
        );

        let oversized = ListParams {
            page_size: Some(MAX_PAGE_SIZE + 1),
            ..ListParams::default()
        };
        assert_eq!(
            ListQuery::from_params(oversized),
            Err(QueryParamError::PageSizeOutOfRange)
        );
    }

    #[test]
    fn defaults_applied_when_params_absent() {
        let query = ListQuery::from_params(ListParams::default()).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(query.sort_field, SortField::CreatedAt);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(query.search, None);
    }

    #[test]
    fn blank_filter_terms_are_dropped() {
        let query = ListQuery::from_params(ListParams {
            search: Some("   ".to_string()),
            course: Some("".to_string()),
            city: Some("  Boston ".to_string()),
            ..ListParams::default()
        })
        .unwrap();
        assert_eq!(query.search, None);
        assert_eq!(query.course, None);
        assert_eq!(query.city, Some("Boston".to_string()));
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("math"), "%math%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c\\d"), "%c\\\\d%");
    }
}
