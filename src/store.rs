use crate::config::StoreOptions;

/// Cross-view state: the update currently opened in the editor and the page
/// size used by list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewStore {
    update_id: Option<String>,
    limit: Option<u32>,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new(&StoreOptions::default())
    }
}

impl ViewStore {
    pub fn new(options: &StoreOptions) -> Self {
        Self {
            update_id: None,
            limit: Some(options.page_limit),
        }
    }

    pub fn update_id(&self) -> Option<&str> {
        self.update_id.as_deref()
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn set_update_id(&mut self, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(update_id = %value, "selecting update");
        self.update_id = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_default_page_limit_and_no_selection() {
        let store = ViewStore::default();
        assert_eq!(store.limit(), Some(10));
        assert_eq!(store.update_id(), None);
    }

    #[test]
    fn set_update_id_replaces_selection() {
        let mut store = ViewStore::new(&StoreOptions { page_limit: 25 });
        store.set_update_id("a1");
        store.set_update_id(String::from("b2"));
        assert_eq!(store.update_id(), Some("b2"));
        assert_eq!(store.limit(), Some(25));
    }
}
