pub mod aggregate;
pub mod filter;
pub mod models;
pub mod query;
pub mod rank;
pub mod routes;
pub mod service;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use booklens_kernel::{settings::Settings, InitCtx, Module};

pub use aggregate::{Aggregator, SearchError};
pub use models::{AggregatedResult, SearchMode, SearchOutcome, SearchRequest};
pub use service::BookSearch;
pub use source::BookSource;

/// Author and title search over Google Books
pub struct BooksModule {
    search: Arc<BookSearch>,
}

impl BooksModule {
    pub fn new(search: Arc<BookSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            fixtures = ctx.settings.upstream.fixture_dir.is_some(),
            max_extra_pages = self.search.max_extra_pages(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.search.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }
}

/// Create the books module backed by the configured book source
pub fn create_module(settings: &Settings) -> anyhow::Result<Arc<dyn Module>> {
    let source = source::from_settings(&settings.upstream)?;
    let search = BookSearch::new(source, &settings.upstream);
    Ok(Arc::new(BooksModule::new(Arc::new(search))))
}

fn search_operation(summary: &str, body_schema: &str, response_schema: &str) -> serde_json::Value {
    serde_json::json!({
        "post": {
            "summary": summary,
            "tags": ["Books"],
            "requestBody": {
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{body_schema}") }
                    }
                }
            },
            "responses": {
                "200": {
                    "description": "Matching books",
                    "content": {
                        "application/json": {
                            "schema": { "$ref": format!("#/components/schemas/{response_schema}") }
                        }
                    }
                },
                "204": { "description": "No matching books" },
                "400": error_response("Malformed JSON body"),
                "422": error_response("Invalid search parameters"),
                "500": error_response("Book search upstream failed")
            }
        }
    })
}

fn error_response(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let paging = serde_json::json!({
        "startOffset": { "type": "integer", "minimum": 0, "description": "Index of the first result" },
        "pageSize": { "type": "integer", "minimum": 0, "maximum": models::MAX_PAGE_SIZE, "description": "Results per page" },
        "extraPages": { "type": "integer", "minimum": 0, "description": "Pages fetched after the first" }
    });

    let mut author_search = serde_json::json!({
        "type": "object",
        "properties": { "author": { "type": "string", "description": "Exact author name" } },
        "required": ["author"]
    });
    let mut title_search = serde_json::json!({
        "type": "object",
        "properties": {
            "title": { "type": "string", "description": "Book title" },
            "author": { "type": "string", "description": "Optional author narrowing the search" }
        },
        "required": ["title"]
    });
    if let Some(paging) = paging.as_object() {
        for (name, schema) in paging {
            author_search["properties"][name] = schema.clone();
            title_search["properties"][name] = schema.clone();
        }
    }

    let book = serde_json::json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "authors": { "type": "array", "items": { "type": "string" } },
            "publishedDate": { "type": "string" },
            "description": { "type": "string" },
            "pageCount": { "type": "integer" },
            "categories": { "type": "array", "items": { "type": "string" } },
            "contentVersion": { "type": "string" },
            "panelizationSummary": { "type": "object" },
            "imageLinks": {
                "type": "object",
                "properties": {
                    "smallThumbnail": { "type": "string" },
                    "thumbnail": { "type": "string" }
                }
            },
            "language": { "type": "string" },
            "previewLink": { "type": "string" },
            "infoLink": { "type": "string" },
            "canonicalVolumeLink": { "type": "string" }
        }
    });

    serde_json::json!({
        "paths": {
            "/author": search_operation("Search books by exact author", "AuthorSearch", "AuthorResponse"),
            "/title": search_operation("Search books by title", "TitleSearch", "TitleResponse"),
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "AuthorSearch": author_search,
                "TitleSearch": title_search,
                "Book": book,
                "AuthorResponse": {
                    "type": "object",
                    "properties": {
                        "author": { "type": "string" },
                        "totalItems": { "type": "integer" },
                        "hasMorePages": { "type": "boolean" },
                        "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                    },
                    "required": ["author", "totalItems", "hasMorePages", "books"]
                },
                "TitleResponse": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "totalItems": { "type": "integer" },
                        "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                    },
                    "required": ["title", "totalItems", "books"]
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn openapi_documents_both_searches() {
        let spec = openapi_fragment();
        assert!(spec["paths"]["/author"]["post"]["responses"]["204"].is_object());
        assert!(spec["paths"]["/title"]["post"].is_object());
        assert_eq!(
            spec["components"]["schemas"]["AuthorSearch"]["properties"]["pageSize"]["maximum"],
            40
        );
    }

    #[tokio::test]
    async fn module_builds_from_fixture_settings() {
        let mut settings = Settings::default();
        settings.upstream.fixture_dir =
            Some(PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures")));

        let module = create_module(&settings).unwrap();
        assert_eq!(module.name(), "books");
        module.init(&InitCtx { settings: &settings }).await.unwrap();
    }

    #[test]
    fn missing_fixture_dir_fails_module_creation() {
        let mut settings = Settings::default();
        settings.upstream.fixture_dir = Some(PathBuf::from("/nonexistent/booklens"));
        let err = create_module(&settings).err().unwrap();
        assert!(format!("{err:#}").contains("failed to load fixtures"));
    }
}
