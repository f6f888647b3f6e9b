use std::path::Path;
use std::sync::Arc;

use deputy_viewer::api::{DeputyCard, DeputyQuery, LookupClient, LookupOutcome};
use deputy_viewer::config::AppConfig;
use deputy_viewer::data::cache::TableCache;
use deputy_viewer::data::export;
use deputy_viewer::data::filter::{
    filtered_indices, filtered_post_indices, top_n, top_posts, FilterCriteria, PostFilter,
};
use deputy_viewer::data::loader::{load_deputies, load_joined, load_posts, Loaded};
use deputy_viewer::data::model::{DeputyTable, Metric, PostTable};
use deputy_viewer::data::source::{Source, SourceKey, Upload};

use crate::color::NetworkColors;

pub const TOP_N_RANGE: std::ops::RangeInclusive<usize> = 5..=20;
pub const TOP_POSTS_RANGE: std::ops::RangeInclusive<usize> = 5..=30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Deputies,
    Posts,
    Lookup,
}

/// Result of the last API search, as shown in the lookup tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupState {
    Idle,
    Found(Vec<DeputyCard>),
    NoResults,
    Failed(String),
}

/// Which upload slot a picked file goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSlot {
    Deputies,
    Engagement,
    Posts,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    deputy_cache: TableCache<DeputyTable>,
    post_cache: TableCache<PostTable>,

    deputies_upload: Option<Upload>,
    engagement_upload: Option<Upload>,
    posts_upload: Option<Upload>,

    /// Normalized deputies; empty when nothing could be loaded.
    pub deputies: Arc<DeputyTable>,
    pub deputies_error: Option<String>,
    pub posts: Arc<PostTable>,
    pub posts_error: Option<String>,
    pub network_colors: NetworkColors,

    pub filters: FilterCriteria,
    /// Indices of deputies passing the current filters (cached).
    pub visible: Vec<usize>,
    pub top_n: usize,

    pub post_filter: PostFilter,
    pub visible_posts: Vec<usize>,
    pub top_posts_n: usize,

    pub tab: Tab,

    pub lookup_query: DeputyQuery,
    pub lookup: LookupState,
    lookup_client: Option<LookupClient>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let mut state = Self {
            config,
            deputy_cache: TableCache::default(),
            post_cache: TableCache::default(),
            deputies_upload: None,
            engagement_upload: None,
            posts_upload: None,
            deputies: Arc::default(),
            deputies_error: None,
            posts: Arc::default(),
            posts_error: None,
            network_colors: NetworkColors::default(),
            filters: FilterCriteria::default(),
            visible: Vec::new(),
            top_n: 10,
            post_filter: PostFilter::default(),
            visible_posts: Vec::new(),
            top_posts_n: 10,
            tab: Tab::Deputies,
            lookup_query: DeputyQuery::default(),
            lookup: LookupState::Idle,
            lookup_client: None,
            status_message: None,
        };
        state.reload();
        state
    }

    // -- Sources -------------------------------------------------------------

    fn deputies_source(&self) -> Source {
        Source::resolve(self.deputies_upload.as_ref(), &self.config.deputies_path)
    }

    fn engagement_source(&self) -> Option<Source> {
        match (&self.engagement_upload, &self.config.engagement_path) {
            (Some(up), _) => Some(Source::Upload(up.clone())),
            (None, Some(path)) => Some(Source::File(path.clone())),
            (None, None) => None,
        }
    }

    fn posts_source(&self) -> Source {
        Source::resolve(self.posts_upload.as_ref(), &self.config.posts_path)
    }

    /// Re-resolve both tables through the cache and recompute every view.
    pub fn reload(&mut self) {
        let deputies = self.deputies_source();
        let loaded: Loaded<Arc<DeputyTable>> = match self.engagement_source() {
            Some(engagement) => {
                let key = SourceKey::joined(deputies.key(), engagement.key());
                self.deputy_cache
                    .get_or_load(key, || load_joined(&deputies, &engagement))
                    .into()
            }
            None => self
                .deputy_cache
                .get_or_load(deputies.key(), || load_deputies(&deputies))
                .into(),
        };
        self.deputies_error = loaded.error.map(|e| {
            log::warn!("deputies unavailable: {e}");
            format!("Erro ao carregar dados dos deputados: {e}")
        });
        self.deputies = loaded.table;

        let posts = self.posts_source();
        let loaded: Loaded<Arc<PostTable>> = self
            .post_cache
            .get_or_load(posts.key(), || load_posts(&posts))
            .into();
        self.posts_error = loaded.error.map(|e| {
            log::warn!("posts unavailable: {e}");
            format!("Erro ao carregar dados dos posts: {e}")
        });
        self.posts = loaded.table;
        self.network_colors = NetworkColors::new(&self.posts.networks);

        self.keep_valid_choices();
        self.refilter();
        self.refilter_posts();
    }

    /// Replace an upload slot. Cache entries built from the previous upload,
    /// joined ones included, are dropped since nothing can reference them.
    pub fn set_upload(&mut self, slot: UploadSlot, upload: Upload) {
        let target = match slot {
            UploadSlot::Deputies => &mut self.deputies_upload,
            UploadSlot::Engagement => &mut self.engagement_upload,
            UploadSlot::Posts => &mut self.posts_upload,
        };
        if let Some(old) = target.replace(upload) {
            let key = Source::Upload(old).key();
            let dropped = match slot {
                UploadSlot::Posts => self.post_cache.invalidate_where(|k| k.mentions(&key)),
                _ => self.deputy_cache.invalidate_where(|k| k.mentions(&key)),
            };
            log::debug!("dropped {dropped} cached tables for replaced upload");
        }
        self.reload();
    }

    /// Forget uploads and re-read the default files from disk.
    pub fn reset_sources(&mut self) {
        self.deputies_upload = None;
        self.engagement_upload = None;
        self.posts_upload = None;
        self.deputy_cache.clear();
        self.post_cache.clear();
        self.reload();
    }

    pub fn has_upload(&self, slot: UploadSlot) -> bool {
        match slot {
            UploadSlot::Deputies => self.deputies_upload.is_some(),
            UploadSlot::Engagement => self.engagement_upload.is_some(),
            UploadSlot::Posts => self.posts_upload.is_some(),
        }
    }

    /// Reset dropdowns whose value vanished with the new table.
    fn keep_valid_choices(&mut self) {
        use deputy_viewer::data::filter::Choice;

        if let Choice::Only(s) = &self.filters.state {
            if !self.deputies.states.contains(s) {
                self.filters.state = Choice::All;
            }
        }
        if let Choice::Only(p) = &self.filters.party {
            if !self.deputies.parties.contains(p) {
                self.filters.party = Choice::All;
            }
        }
        if let Choice::Only(n) = &self.post_filter.network {
            if !self.posts.networks.contains(n) {
                self.post_filter.network = Choice::All;
            }
        }
    }

    // -- Filtering -----------------------------------------------------------

    /// Recompute `visible` after a filter change.
    pub fn refilter(&mut self) {
        self.visible = filtered_indices(&self.deputies, &self.filters);
        log::debug!("{} of {} deputies visible", self.visible.len(), self.deputies.len());
    }

    pub fn refilter_posts(&mut self) {
        self.visible_posts = filtered_post_indices(&self.posts, &self.post_filter);
    }

    pub fn top(&self, metric: Metric) -> Vec<usize> {
        top_n(&self.deputies, &self.visible, metric, self.top_n)
    }

    pub fn top_posts(&self) -> Vec<usize> {
        top_posts(&self.posts, &self.visible_posts, self.top_posts_n)
    }

    // -- Actions -------------------------------------------------------------

    pub fn export_visible(&self, path: &Path) -> anyhow::Result<()> {
        export::save_deputies_csv(path, &self.deputies, &self.visible)
    }

    /// One blocking search against the open-data API.
    pub fn run_lookup(&mut self) {
        if self.lookup_client.is_none() {
            match LookupClient::new(self.config.api_base_url.clone()) {
                Ok(client) => self.lookup_client = Some(client),
                Err(e) => {
                    log::error!("cannot build HTTP client: {e}");
                    self.lookup = LookupState::Failed(format!("Erro ao consultar a API da Câmara: {e}"));
                    return;
                }
            }
        }
        let Some(client) = &self.lookup_client else {
            return;
        };

        self.lookup = match client.search(&self.lookup_query) {
            Ok(LookupOutcome::Found(cards)) => LookupState::Found(cards),
            Ok(LookupOutcome::NoResults) => LookupState::NoResults,
            Err(e) => {
                log::error!("deputy lookup failed: {e}");
                LookupState::Failed(format!("Erro ao consultar a API da Câmara: {e}"))
            }
        };
    }
}
