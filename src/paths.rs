/// Converts asset URLs between the absolute form used for display and the
/// relative form stored on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNormalizer {
    base_url: String,
}

impl PathNormalizer {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `reversal == true` yields the absolute URL, `false` the relative one.
    pub fn complete_image_path(&self, url: &str, reversal: bool) -> String {
        if reversal {
            self.to_absolute(url)
        } else {
            self.to_relative(url)
        }
    }

    /// Prepends the base URL unless `url` already carries it.
    pub fn to_absolute(&self, url: &str) -> String {
        if self.strip_base(url).is_some() {
            return url.to_owned();
        }
        format!("{}{}", self.base_url, url)
    }

    /// Removes exactly the prefix `to_absolute` adds.
    pub fn to_relative(&self, url: &str) -> String {
        self.strip_base(url).unwrap_or(url).to_owned()
    }

    fn strip_base<'u>(&self, url: &'u str) -> Option<&'u str> {
        if self.base_url.is_empty() {
            return None;
        }
        url.strip_prefix(self.base_url.as_str())
    }
}
