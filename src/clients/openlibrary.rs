use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, total_or_len};
use crate::models::content::Book;

const OPENLIBRARY_API: &str = "https://openlibrary.org";
const COVERS_API: &str = "https://covers.openlibrary.org/b/id";

const SEARCH_FIELDS: &str = "key,title,author_name,cover_i,number_of_pages_median";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<Doc>,
    num_found: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Doc {
    key: String,
    title: Option<String>,
    author_name: Option<Vec<String>>,
    cover_i: Option<i64>,
    number_of_pages_median: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct WorkDetail {
    error: Option<String>,
    title: Option<String>,
    covers: Option<Vec<i64>>,
    authors: Option<Vec<AuthorEntry>>,
}

/// Works reference authors either inline or through a nested "author" ref,
/// depending on the record's age.
#[derive(Debug, Deserialize)]
struct AuthorEntry {
    author: Option<AuthorRef>,
    key: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    key: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorDetail {
    name: Option<String>,
}

/// Open Library requires no credentials.
#[derive(Clone)]
pub struct OpenLibraryClient {
    client: Client,
}

impl OpenLibraryClient {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn search(
        &self,
        query: &str,
        author: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Book>, u64), ProviderError> {
        let mut url = format!(
            "{OPENLIBRARY_API}/search.json?q={}&limit={limit}&offset={offset}&fields={SEARCH_FIELDS}",
            urlencoding::encode(query)
        );
        if let Some(author) = author {
            url.push_str(&format!("&author={}", urlencoding::encode(author)));
        }

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                service: "Open Library",
                message: format!("{status} - {body}"),
            });
        }

        let payload: SearchResponse = response.json().await?;
        let total = total_or_len(payload.num_found, payload.docs.len());
        let books = payload.docs.into_iter().map(normalize_doc).collect();

        Ok((books, total))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Book>, ProviderError> {
        let url = format!("{OPENLIBRARY_API}/works/{id}.json");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let detail: WorkDetail = response.json().await?;
        if detail.error.is_some() {
            return Ok(None);
        }

        let author = self.resolve_authors(detail.authors).await;
        let cover = detail
            .covers
            .and_then(|c| c.first().copied())
            .filter(|&c| c > 0)
            .map(|c| format!("{COVERS_API}/{c}-L.jpg"));

        Ok(Some(Book {
            id: id.to_string(),
            title: detail.title.unwrap_or_default(),
            author,
            cover,
            // the works endpoint has no page counts
            total_pages: None,
            url: Some(format!("{OPENLIBRARY_API}/works/{id}")),
        }))
    }

    async fn resolve_authors(&self, entries: Option<Vec<AuthorEntry>>) -> String {
        let Some(entries) = entries else {
            return "Unknown".to_string();
        };

        let mut names = Vec::new();
        for entry in entries {
            let inline = entry
                .name
                .or_else(|| entry.author.as_ref().and_then(|a| a.name.clone()));
            if let Some(name) = inline {
                names.push(name);
                continue;
            }

            let key = entry.key.or_else(|| entry.author.and_then(|a| a.key));
            let name = match key {
                Some(key) => self.fetch_author_name(&key).await,
                None => None,
            };
            names.push(name.unwrap_or_else(|| "Unknown".to_string()));
        }

        if names.is_empty() {
            "Unknown".to_string()
        } else {
            names.join(", ")
        }
    }

    /// Best effort: any failure along the way leaves the author unresolved.
    async fn fetch_author_name(&self, key: &str) -> Option<String> {
        let url = format!("{OPENLIBRARY_API}{key}.json");
        let response = self.client.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let detail: AuthorDetail = response.json().await.ok()?;
        detail.name
    }
}

fn normalize_doc(doc: Doc) -> Book {
    let id = doc
        .key
        .strip_prefix("/works/")
        .unwrap_or(&doc.key)
        .to_string();

    Book {
        title: doc.title.unwrap_or_default(),
        author: doc
            .author_name
            .filter(|names| !names.is_empty())
            .map_or_else(|| "Unknown".to_string(), |names| names.join(", ")),
        cover: doc.cover_i.map(|c| format!("{COVERS_API}/{c}-L.jpg")),
        total_pages: doc.number_of_pages_median,
        url: Some(format!("{OPENLIBRARY_API}/works/{id}")),
        id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_strips_works_prefix_and_joins_authors() {
        let book = normalize_doc(Doc {
            key: "/works/OL45883W".to_string(),
            title: Some("The Fellowship of the Ring".to_string()),
            author_name: Some(vec![
                "J. R. R. Tolkien".to_string(),
                "Someone Else".to_string(),
            ]),
            cover_i: Some(9255566),
            number_of_pages_median: Some(423),
        });

        assert_eq!(book.id, "OL45883W");
        assert_eq!(book.author, "J. R. R. Tolkien, Someone Else");
        assert_eq!(
            book.cover.as_deref(),
            Some("https://covers.openlibrary.org/b/id/9255566-L.jpg")
        );
        assert_eq!(book.total_pages, Some(423));
        assert_eq!(
            book.url.as_deref(),
            Some("https://openlibrary.org/works/OL45883W")
        );
    }

    #[test]
    fn doc_without_authors_is_unknown() {
        let book = normalize_doc(Doc {
            key: "OL1W".to_string(),
            title: None,
            author_name: Some(vec![]),
            cover_i: None,
            number_of_pages_median: None,
        });

        assert_eq!(book.id, "OL1W");
        assert_eq!(book.author, "Unknown");
        assert!(book.cover.is_none());
    }
}
