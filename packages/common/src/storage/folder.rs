use std::fmt;

/// Asset folder namespaced by the kind of entity that owns the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetFolder {
    Categories,
    Products,
    Restaurants,
}

impl AssetFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Products => "products",
            Self::Restaurants => "restaurants",
        }
    }

    /// Full folder path under an optional deployment-wide prefix.
    pub fn path(&self, prefix: &str) -> String {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            self.as_str().to_string()
        } else {
            format!("{prefix}/{}", self.as_str())
        }
    }
}

impl fmt::Display for AssetFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
