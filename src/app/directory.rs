use crate::core::catalog::{self, CatalogPage, CatalogView};
use crate::domain::model::Comercio;
use crate::domain::ports::ComercioStore;
use crate::utils::error::Result;

/// One rendered listing: the active page plus the size of the whole fetched
/// collection (the footer counter shows the unfiltered total).
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub page: CatalogPage,
    pub fetched_total: usize,
}

/// Read side of the directory: browse, search, inspect.
/// Open to everyone including anonymous visitors.
pub struct DirectoryService<C: ComercioStore> {
    comercios: C,
}

impl<C: ComercioStore> DirectoryService<C> {
    pub fn new(comercios: C) -> Self {
        Self { comercios }
    }

    /// Fetches the full collection and runs filter/sort/paginate over it.
    /// An empty collection is a zero-count listing, not an error.
    pub async fn browse(&self, view: &CatalogView) -> Result<Listing> {
        let all = self.comercios.list().await?;
        tracing::debug!("fetched {} comercios", all.len());
        Ok(Listing {
            page: view.render(&all),
            fetched_total: all.len(),
        })
    }

    /// Like [`browse`](Self::browse), but first navigates the view to
    /// `page` against the filtered total, so an out-of-range request is
    /// ignored rather than rendering past the end.
    pub async fn browse_page(&self, view: &mut CatalogView, page: usize) -> Result<Listing> {
        let all = self.comercios.list().await?;
        let filtered_len = catalog::apply(&all, view.filter()).len();
        view.go_to_page(page, catalog::total_pages(filtered_len));
        Ok(Listing {
            page: view.render(&all),
            fetched_total: all.len(),
        })
    }

    pub async fn categories(&self) -> Result<Vec<String>> {
        let all = self.comercios.list().await?;
        Ok(catalog::categories(&all))
    }

    pub async fn show(&self, id: &str) -> Result<Comercio> {
        self.comercios.get(id).await
    }
}
