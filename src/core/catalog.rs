use crate::domain::model::Comercio;
use std::cmp::Ordering;
use std::str::FromStr;

/// Fixed page size of the listing grid.
pub const ITEMS_PER_PAGE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Lexicographic by name, A first.
    #[default]
    AToZ,
    ZToA,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a-z" | "asc" => Ok(Self::AToZ),
            "z-a" | "desc" => Ok(Self::ZToA),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Filter configuration for the listing. Empty/None fields do not filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive substring of the city.
    pub city: Option<String>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    /// Case-insensitive free text over email, category and city.
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl CatalogFilter {
    fn matches(&self, comercio: &Comercio) -> bool {
        if let Some(category) = &self.category {
            if comercio.category != *category {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !comercio.city.to_lowercase().contains(&city.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = self.min_score {
            if comercio.scoring < min {
                return false;
            }
        }
        if let Some(max) = self.max_score {
            if comercio.scoring > max {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = comercio.email.to_lowercase().contains(&needle)
                || comercio.category.to_lowercase().contains(&needle)
                || comercio.city.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Applies filters then sorts by name. The sort is stable, so records with
/// equal names keep their relative order from the fetched collection.
pub fn apply(comercios: &[Comercio], filter: &CatalogFilter) -> Vec<Comercio> {
    let mut result: Vec<Comercio> = comercios
        .iter()
        .filter(|c| filter.matches(c))
        .cloned()
        .collect();

    result.sort_by(|a, b| {
        let ordering = compare_names(&a.name, &b.name);
        match filter.sort {
            SortOrder::AToZ => ordering,
            SortOrder::ZToA => ordering.reverse(),
        }
    });

    result
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Distinct categories of the fetched collection, in first-seen order.
pub fn categories(comercios: &[Comercio]) -> Vec<String> {
    let mut seen = Vec::new();
    for comercio in comercios {
        if !seen.contains(&comercio.category) {
            seen.push(comercio.category.clone());
        }
    }
    seen
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<Comercio>,
    /// 1-based page number.
    pub number: usize,
    pub total_pages: usize,
    /// Size of the filtered sequence across all pages.
    pub filtered_total: usize,
}

impl CatalogPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn total_pages(filtered_len: usize) -> usize {
    filtered_len.div_ceil(ITEMS_PER_PAGE)
}

/// Slices the filtered sequence into the requested 1-based page.
/// A page number past the end yields an empty page, not an error.
pub fn page_of(filtered: &[Comercio], number: usize) -> CatalogPage {
    let number = number.max(1);
    let start = (number - 1) * ITEMS_PER_PAGE;
    let items = filtered
        .iter()
        .skip(start)
        .take(ITEMS_PER_PAGE)
        .cloned()
        .collect();
    CatalogPage {
        items,
        number,
        total_pages: total_pages(filtered.len()),
        filtered_total: filtered.len(),
    }
}

/// View state of the listing: active filters plus the active page.
/// Changing any filter resets the page to 1; navigation outside
/// `1..=total_pages` is ignored, matching the paginator widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogView {
    filter: CatalogFilter,
    page: usize,
}

impl CatalogView {
    pub fn new() -> Self {
        Self {
            filter: CatalogFilter::default(),
            page: 1,
        }
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.filter.category = category;
        self.page = 1;
    }

    pub fn set_city(&mut self, city: Option<String>) {
        self.filter.city = city;
        self.page = 1;
    }

    pub fn set_score_range(&mut self, min: Option<f64>, max: Option<f64>) {
        self.filter.min_score = min;
        self.filter.max_score = max;
        self.page = 1;
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.filter.search = search;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.filter.sort = sort;
        self.page = 1;
    }

    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        if page < 1 || page > total_pages {
            return;
        }
        self.page = page;
    }

    /// Runs the whole pipeline over the fetched collection.
    pub fn render(&self, comercios: &[Comercio]) -> CatalogPage {
        let filtered = apply(comercios, &self.filter);
        page_of(&filtered, self.page())
    }
}
