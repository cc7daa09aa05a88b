//! One mounted filter widget: the state store, its URL binding, the result
//! inputs (sort, page, favorites) and the derived views computed from them.
//!
//! Derived views are memoised and recomputed lazily. A mutation made through
//! [`FilterSession::update`] that changes the store invalidates them and
//! pushes the new query to the URL before `update` returns.

use std::sync::Arc;

use once_cell::unsync::OnceCell;

use crate::{
    filter_state::{self, FilterStore},
    models::{AppliedFilter, FilterOption, FilterState, SortKey},
    results::{DEFAULT_PAGE_SIZE, Favorites, ResultEngine, ResultPage, ResultQuery},
    url_sync::{FilterUrlSync, UrlHost},
};

pub struct FilterSession<H: UrlHost> {
    store: FilterStore,
    url_sync: FilterUrlSync<H>,
    engine: Arc<ResultEngine>,
    sort: SortKey,
    page: usize,
    page_size: usize,
    favorites: Favorites,
    extras_search: String,
    applied: OnceCell<Vec<AppliedFilter>>,
    results: OnceCell<ResultPage>,
}

impl<H: UrlHost> FilterSession<H> {
    /// Starts from `initial`, then lets the URL hydrate the store if `initial` is empty.
    pub fn mount(engine: Arc<ResultEngine>, initial: FilterState, host: H) -> Self {
        let mut store = FilterStore::with_state(initial);
        let url_sync = FilterUrlSync::attach(&mut store, host);

        Self {
            store,
            url_sync,
            engine,
            sort: SortKey::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            favorites: Favorites::new(),
            extras_search: String::new(),
            applied: OnceCell::new(),
            results: OnceCell::new(),
        }
    }

    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    pub fn state(&self) -> &FilterState {
        self.store.state()
    }

    /// Applies one mutation to the store atomically.
    ///
    /// When the store changed, derived views are dropped, the page returns to
    /// the first one and the URL is rewritten.
    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut FilterStore) -> R) -> R {
        let before = self.store.revision();
        let output = mutate(&mut self.store);

        if self.store.revision() != before {
            self.applied.take();
            self.results.take();
            self.page = 1;
            self.url_sync.sync(self.store.state());
        }
        output
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if self.sort != sort {
            self.sort = sort;
            self.page = 1;
            self.results.take();
        }
    }

    /// Requested page; the effective page is clamped in [`Self::results`].
    pub fn set_page(&mut self, page: usize) {
        if self.page != page {
            self.page = page;
            self.results.take();
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if self.page_size != page_size {
            self.page_size = page_size;
            self.page = 1;
            self.results.take();
        }
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn set_favorites(&mut self, favorites: Favorites) {
        self.favorites = favorites;
    }

    /// Replaces the favorites with a toggled copy and returns it.
    pub fn toggle_favorite(&mut self, id: &str) -> &Favorites {
        self.favorites = self.favorites.toggle(id);
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.is_favorite(id)
    }

    pub fn set_extras_search(&mut self, search: impl Into<String>) {
        self.extras_search = search.into();
    }

    pub fn filtered_extra_options(&self) -> Vec<&'static FilterOption> {
        filter_state::filtered_extra_options(&self.extras_search)
    }

    pub fn applied_filters(&self) -> &[AppliedFilter] {
        self.applied.get_or_init(|| {
            tracing::debug!("Recomputing applied filters (revision {})", self.store.revision());
            self.store.applied_filters()
        })
    }

    pub fn results(&self) -> &ResultPage {
        self.results.get_or_init(|| {
            let query = ResultQuery {
                sort: self.sort,
                page: self.page,
                page_size: self.page_size,
            };
            self.engine.query(self.store.state(), &query)
        })
    }

    /// Canonical filter query last written to the URL.
    pub fn query(&self) -> &str {
        self.url_sync.query()
    }

    pub fn url_host(&self) -> &H {
        self.url_sync.host()
    }
}
