use std::collections::BTreeSet;

use crate::catalog::{self, CatalogError};
use crate::config::{validate, Config};
use crate::contract::{
    BestMatchRequest, CafeResultDto, CoreRequest, CoreResponse, SearchRequest, SearchResponse,
    ToggleResponse,
};
use crate::model::Cafe;
use crate::profile::{self, Profile, ProfileError, ProfileUpdate};
use crate::search::{self, FilterCriteria};
use crate::store::{KeyValueStore, SqliteStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Profile(ProfileError),
    #[error("cafe not found: {0}")]
    CafeNotFound(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<ProfileError> for ServiceError {
    fn from(value: ProfileError) -> Self {
        match value {
            ProfileError::Store(error) => Self::Store(error),
            other => Self::Profile(other),
        }
    }
}

pub struct CafeService {
    config: Config,
    catalog: Vec<Cafe>,
    store: Box<dyn KeyValueStore>,
}

impl CafeService {
    /// Opens the sqlite store and catalog named by `config`.
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let catalog = match &config.catalog_path {
            Some(path) => catalog::load_file(path)?,
            None => catalog::builtin()?,
        };
        let store = SqliteStore::open_file(&config.store_path)?;
        tracing::info!(
            cafes = catalog.len(),
            store = %config.store_path.display(),
            "cafe service ready"
        );
        Ok(Self {
            config,
            catalog,
            store: Box::new(store),
        })
    }

    pub fn with_parts(
        config: Config,
        catalog: Vec<Cafe>,
        store: Box<dyn KeyValueStore>,
    ) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        catalog::validate(&catalog)?;
        Ok(Self {
            config,
            catalog,
            store,
        })
    }

    pub fn catalog(&self) -> &[Cafe] {
        &self.catalog
    }

    pub fn cafe(&self, id: &str) -> Result<&Cafe, ServiceError> {
        catalog::find(&self.catalog, id).ok_or_else(|| ServiceError::CafeNotFound(id.to_string()))
    }

    pub fn search(&self, query: &str, criteria: &FilterCriteria) -> Vec<Cafe> {
        let results = search::filter_records(&self.catalog, query, criteria);
        tracing::debug!(query, matches = results.len(), "filtered catalog");
        results.into_iter().cloned().collect()
    }

    pub fn search_request(&self, request: &SearchRequest) -> Result<Vec<Cafe>, ServiceError> {
        let mut criteria = FilterCriteria {
            tag: request
                .tag
                .as_deref()
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string),
            price: request.price,
            student_only: request.student_only,
            ids: None,
        };

        if request.bookmarked_only {
            criteria.ids = Some(profile::bookmarks(&*self.store)?.into_iter().collect());
        }
        if request.visited_only {
            let visited: BTreeSet<String> =
                profile::visited(&*self.store)?.into_iter().collect();
            criteria.ids = Some(match criteria.ids.take() {
                Some(bookmarked) => bookmarked.intersection(&visited).cloned().collect(),
                None => visited,
            });
        }

        Ok(self.search(&request.query, &criteria))
    }

    pub fn best_matches(&self, keyword: &str, limit: Option<usize>) -> Vec<Cafe> {
        let limit = limit
            .unwrap_or(self.config.best_match_limit)
            .min(self.config.best_match_limit);
        search::best_matches(&self.catalog, keyword, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn toggle_bookmark(&self, id: &str) -> Result<bool, ServiceError> {
        self.cafe(id)?;
        Ok(profile::toggle_bookmark(&*self.store, id)?)
    }

    pub fn toggle_visited(&self, id: &str) -> Result<bool, ServiceError> {
        self.cafe(id)?;
        Ok(profile::toggle_visited(&*self.store, id)?)
    }

    /// Bookmarked cafes in catalog order. Stored ids that no longer exist in
    /// the catalog are skipped.
    pub fn bookmarked_cafes(&self) -> Result<Vec<Cafe>, ServiceError> {
        let ids = profile::bookmarks(&*self.store)?;
        Ok(self.cafes_in(&ids))
    }

    pub fn visited_cafes(&self) -> Result<Vec<Cafe>, ServiceError> {
        let ids = profile::visited(&*self.store)?;
        Ok(self.cafes_in(&ids))
    }

    pub fn profile(&self) -> Result<Profile, ServiceError> {
        Ok(profile::load_profile(&*self.store)?)
    }

    pub fn is_onboarded(&self) -> Result<bool, ServiceError> {
        Ok(profile::has_completed_onboarding(&*self.store)?)
    }

    pub fn onboard(&self, name: &str, bio: &str) -> Result<Profile, ServiceError> {
        Ok(profile::complete_onboarding(&*self.store, name, bio)?)
    }

    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ServiceError> {
        Ok(profile::update_profile(&*self.store, update)?)
    }

    pub fn reset_account(&self) -> Result<(), ServiceError> {
        Ok(profile::reset_account(&*self.store)?)
    }

    pub fn to_results(&self, cafes: &[Cafe]) -> Result<Vec<CafeResultDto>, ServiceError> {
        let bookmarks = profile::bookmarks(&*self.store)?;
        let visited = profile::visited(&*self.store)?;
        Ok(cafes
            .iter()
            .map(|cafe| {
                CafeResultDto::from_cafe(
                    cafe,
                    bookmarks.contains(&cafe.id),
                    visited.contains(&cafe.id),
                )
            })
            .collect())
    }

    pub fn handle_command(&self, request: CoreRequest) -> Result<CoreResponse, ServiceError> {
        match request {
            CoreRequest::Search(request) => {
                let cafes = self.search_request(&request)?;
                Ok(CoreResponse::Search(self.search_response(&cafes)?))
            }
            CoreRequest::BestMatch(BestMatchRequest { keyword, limit }) => {
                if keyword.trim().is_empty() {
                    return Err(ServiceError::InvalidRequest("keyword is required".into()));
                }
                if limit == Some(0) {
                    return Err(ServiceError::InvalidRequest("limit must be positive".into()));
                }
                let cafes = self.best_matches(&keyword, limit);
                Ok(CoreResponse::BestMatch(self.search_response(&cafes)?))
            }
            CoreRequest::ToggleBookmark(request) => {
                let id = required_id(&request.id)?;
                let active = self.toggle_bookmark(id)?;
                Ok(CoreResponse::ToggleBookmark(ToggleResponse {
                    id: id.to_string(),
                    active,
                }))
            }
            CoreRequest::ToggleVisited(request) => {
                let id = required_id(&request.id)?;
                let active = self.toggle_visited(id)?;
                Ok(CoreResponse::ToggleVisited(ToggleResponse {
                    id: id.to_string(),
                    active,
                }))
            }
            CoreRequest::Bookmarks => {
                let cafes = self.bookmarked_cafes()?;
                Ok(CoreResponse::Bookmarks(self.search_response(&cafes)?))
            }
            CoreRequest::Visited => {
                let cafes = self.visited_cafes()?;
                Ok(CoreResponse::Visited(self.search_response(&cafes)?))
            }
            CoreRequest::GetProfile => Ok(CoreResponse::Profile(self.profile()?)),
            CoreRequest::Onboard(request) => Ok(CoreResponse::Profile(
                self.onboard(&request.name, &request.bio)?,
            )),
            CoreRequest::UpdateProfile(update) => {
                Ok(CoreResponse::Profile(self.update_profile(&update)?))
            }
            CoreRequest::ResetAccount => {
                self.reset_account()?;
                Ok(CoreResponse::ResetAccount)
            }
        }
    }

    fn search_response(&self, cafes: &[Cafe]) -> Result<SearchResponse, ServiceError> {
        Ok(SearchResponse {
            results: self.to_results(cafes)?,
        })
    }

    fn cafes_in(&self, ids: &[String]) -> Vec<Cafe> {
        self.catalog
            .iter()
            .filter(|cafe| ids.contains(&cafe.id))
            .cloned()
            .collect()
    }
}

fn required_id(raw: &str) -> Result<&str, ServiceError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ServiceError::InvalidRequest("cafe id is required".into()));
    }
    Ok(id)
}
