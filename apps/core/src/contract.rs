use serde::{Deserialize, Serialize};

use crate::model::{Cafe, MenuItem, PriceRange};
use crate::profile::{Profile, ProfileUpdate};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub price: Option<PriceRange>,
    #[serde(default)]
    pub student_only: bool,
    #[serde(default)]
    pub bookmarked_only: bool,
    #[serde(default)]
    pub visited_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CafeResultDto {
    pub id: String,
    pub name: String,
    pub address: String,
    pub description: String,
    pub price_range: PriceRange,
    pub student_friendly: bool,
    pub tags: Vec<String>,
    pub hours: String,
    pub map_url: String,
    pub menu: Vec<MenuItem>,
    pub bookmarked: bool,
    pub visited: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResponse {
    pub results: Vec<CafeResultDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BestMatchRequest {
    pub keyword: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CafeIdRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleResponse {
    pub id: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OnboardRequest {
    pub name: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload")]
pub enum CoreRequest {
    Search(SearchRequest),
    BestMatch(BestMatchRequest),
    ToggleBookmark(CafeIdRequest),
    ToggleVisited(CafeIdRequest),
    Bookmarks,
    Visited,
    GetProfile,
    Onboard(OnboardRequest),
    UpdateProfile(ProfileUpdate),
    ResetAccount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload")]
pub enum CoreResponse {
    Search(SearchResponse),
    BestMatch(SearchResponse),
    ToggleBookmark(ToggleResponse),
    ToggleVisited(ToggleResponse),
    Bookmarks(SearchResponse),
    Visited(SearchResponse),
    Profile(Profile),
    ResetAccount,
}

impl CafeResultDto {
    pub fn from_cafe(cafe: &Cafe, bookmarked: bool, visited: bool) -> Self {
        Self {
            id: cafe.id.clone(),
            name: cafe.name.clone(),
            address: cafe.address.clone(),
            description: cafe.description.clone(),
            price_range: cafe.price_range,
            student_friendly: cafe.student_friendly,
            tags: cafe.tags.clone(),
            hours: cafe.hours.clone(),
            map_url: cafe.map_url.clone(),
            menu: cafe.menu.clone(),
            bookmarked,
            visited,
        }
    }
}
