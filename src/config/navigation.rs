use crate::records::{Bar, NavIcon};

/// Navigation bar shipped with a fresh config.
pub fn default_navigation() -> Vec<Bar> {
    [
        ("动态", "/home/update", NavIcon::Management),
        ("成员", "/home/member", NavIcon::User),
        ("成就", "/home/achieves", NavIcon::Medal),
    ]
    .into_iter()
    .map(|(name, href, icon)| Bar {
        record_id: None,
        name: name.to_owned(),
        href: href.to_owned(),
        icon: Some(icon),
    })
    .collect()
}
