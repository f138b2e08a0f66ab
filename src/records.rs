//! Record shapes served by the site API and consumed by the views.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::value::Identified;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum NavIcon {
    Management,
    User,
    Medal,
}

/// One navigation bar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub name: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<NavIcon>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub name: String,
    pub head: String,
    pub status: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achieve {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub name: String,
    #[serde(rename = "imgSrc")]
    pub img_src: String,
}

/// Abridged update shown in the update list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateView {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub title: String,
    pub cover: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ellipsis: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateContent {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub content: String,
}

pub type BarList = Vec<Identified<Bar>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_field_names_are_preserved() {
        let raw = json!({
            "_id": "65f0",
            "title": "Demo day",
            "cover": "/img/cover.png",
            "createdAt": "2024-03-05T00:00:00Z",
            "author": "Lin"
        });
        let view: UpdateView = serde_json::from_value(raw.clone()).expect("parse update");
        assert_eq!(view.record_id.as_deref(), Some("65f0"));
        assert_eq!(view.ellipsis, None);
        assert_eq!(serde_json::to_value(&view).expect("serialize"), raw);

        let achieve: Achieve =
            serde_json::from_value(json!({"name": "Cup", "imgSrc": "/img/cup.png"}))
                .expect("parse achieve");
        assert_eq!(achieve.img_src, "/img/cup.png");
    }

    #[test]
    fn nav_icons_round_trip_through_names() {
        assert_eq!("Medal".parse::<NavIcon>().expect("icon"), NavIcon::Medal);
        assert_eq!(NavIcon::Management.to_string(), "Management");
    }
}
