//! Book catalog queries

use shared::models::Book;
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const BOOK_COLUMNS: &str = "id, title, author, description, category, price, image_url, created_at";

/// Optional catalog filters, combined with AND.
///
/// Every filter is always bound; a NULL bind disables that predicate so the
/// SQL stays static (no query building).
#[derive(Debug, Default)]
pub struct BookFilters {
    /// Case-insensitive substring match over title, author and description
    pub search: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    /// Inclusive lower bound, epoch milliseconds
    pub created_after: Option<i64>,
    /// Exclusive upper bound, epoch milliseconds
    pub created_before: Option<i64>,
    pub price_min: Option<rust_decimal::Decimal>,
    pub price_max: Option<rust_decimal::Decimal>,
}

const FILTER_CLAUSE: &str = "($1::text IS NULL OR title ILIKE '%' || $1 || '%' OR author ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%')
       AND ($2::text IS NULL OR category = $2)
       AND ($3::text IS NULL OR author = $3)
       AND ($4::bigint IS NULL OR created_at >= $4)
       AND ($5::bigint IS NULL OR created_at < $5)
       AND ($6::numeric IS NULL OR price >= $6)
       AND ($7::numeric IS NULL OR price <= $7)";

pub async fn count_filtered(pool: &PgPool, f: &BookFilters) -> Result<i64, BoxError> {
    let sql = format!("SELECT COUNT(*) FROM books WHERE {FILTER_CLAUSE}");
    let total: i64 = sqlx::query_scalar(&sql)
        .bind(f.search.as_deref())
        .bind(f.category.as_deref())
        .bind(f.author.as_deref())
        .bind(f.created_after)
        .bind(f.created_before)
        .bind(f.price_min)
        .bind(f.price_max)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

pub async fn list_filtered(
    pool: &PgPool,
    f: &BookFilters,
    limit: i64,
    offset: i64,
) -> Result<Vec<Book>, BoxError> {
    let sql = format!(
        "SELECT {BOOK_COLUMNS} FROM books WHERE {FILTER_CLAUSE}
         ORDER BY created_at DESC LIMIT $8 OFFSET $9"
    );
    let books: Vec<Book> = sqlx::query_as(&sql)
        .bind(f.search.as_deref())
        .bind(f.category.as_deref())
        .bind(f.author.as_deref())
        .bind(f.created_after)
        .bind(f.created_before)
        .bind(f.price_min)
        .bind(f.price_max)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(books)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Book>, BoxError> {
    let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1");
    let book: Option<Book> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(book)
}

/// Fetch a batch of books by id for server-side cart re-pricing
pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Book>, BoxError> {
    let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ANY($1)");
    let books: Vec<Book> = sqlx::query_as(&sql).bind(ids).fetch_all(pool).await?;
    Ok(books)
}

/// Build a prefix-matching tsquery from free text: `hob gard` → `hob:* & gard:*`
///
/// Words are stripped to alphanumerics so user input can never inject
/// tsquery operators.
pub fn build_prefix_tsquery(raw: &str) -> String {
    raw.split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|w| !w.is_empty())
        .map(|w| format!("{w}:*"))
        .collect::<Vec<_>>()
        .join(" & ")
}

/// Full-text search over title/author/description, best match first.
/// Returns at most 10 rows; an empty or unusable query yields no rows.
pub async fn search_ranked(pool: &PgPool, raw_query: &str) -> Result<Vec<Book>, BoxError> {
    let tsquery = build_prefix_tsquery(raw_query);
    if tsquery.is_empty() {
        return Ok(Vec::new());
    }

    let books: Vec<Book> = sqlx::query_as(
        "SELECT b.id, b.title, b.author, b.description, b.category, b.price, b.image_url, b.created_at
         FROM books b, to_tsquery('english', $1) AS q
         WHERE b.search_tsv @@ q
         ORDER BY ts_rank(b.search_tsv, q) DESC, b.created_at DESC
         LIMIT 10",
    )
    .bind(&tsquery)
    .fetch_all(pool)
    .await?;
    Ok(books)
}

/// Books ranked by historical order-line count, best seller first
pub async fn top_sellers(pool: &PgPool, limit: i64) -> Result<Vec<Book>, BoxError> {
    let books: Vec<Book> = sqlx::query_as(
        "SELECT b.id, b.title, b.author, b.description, b.category, b.price, b.image_url, b.created_at
         FROM books b
         JOIN order_items oi ON oi.book_id = b.id
         GROUP BY b.id
         ORDER BY COUNT(oi.id) DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(books)
}

/// Random catalog sample, used when no sales exist yet
pub async fn random_sample(pool: &PgPool, limit: i64) -> Result<Vec<Book>, BoxError> {
    let sql = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY RANDOM() LIMIT $1");
    let books: Vec<Book> = sqlx::query_as(&sql).bind(limit).fetch_all(pool).await?;
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tsquery_single_word() {
        assert_eq!(build_prefix_tsquery("hobbit"), "hobbit:*");
    }

    #[test]
    fn test_tsquery_multiple_words() {
        assert_eq!(build_prefix_tsquery("the hobbit"), "the:* & hobbit:*");
        assert_eq!(build_prefix_tsquery("  lord   rings  "), "lord:* & rings:*");
    }

    #[test]
    fn test_tsquery_strips_operators() {
        assert_eq!(build_prefix_tsquery("c++ & rust!"), "c:* & rust:*");
        assert_eq!(build_prefix_tsquery("a|b"), "ab:*");
    }

    #[test]
    fn test_tsquery_empty_input() {
        assert_eq!(build_prefix_tsquery(""), "");
        assert_eq!(build_prefix_tsquery("   "), "");
        assert_eq!(build_prefix_tsquery("&&& !!!"), "");
    }

    #[test]
    fn test_tsquery_unicode_words_survive() {
        assert_eq!(build_prefix_tsquery("café"), "café:*");
    }
}
