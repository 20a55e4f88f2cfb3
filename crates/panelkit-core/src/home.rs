//! Where users land after signing in.

use std::fmt;

use crate::manifest::UserCallable;

/// The configured user home.
#[derive(Clone, Default)]
pub enum UserHome {
    /// The default dashboard's URL.
    #[default]
    Default,
    /// A literal URL.
    Url(String),
    /// A callable invoked with the user.
    Callable(UserCallable),
    /// Dotted reference to a callable in the module manifest.
    Reference(String),
}

impl UserHome {
    /// Interpret a string setting. A value containing `/` is a URL,
    /// anything else is a dotted reference.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            None => UserHome::Default,
            Some(value) if value.is_empty() => UserHome::Default,
            Some(value) if value.contains('/') => UserHome::Url(value.to_string()),
            Some(value) => UserHome::Reference(value.to_string()),
        }
    }
}

impl fmt::Debug for UserHome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserHome::Default => f.write_str("Default"),
            UserHome::Url(url) => f.debug_tuple("Url").field(url).finish(),
            UserHome::Callable(_) => f.write_str("Callable(..)"),
            UserHome::Reference(path) => f.debug_tuple("Reference").field(path).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_setting() {
        assert!(matches!(UserHome::from_setting(None), UserHome::Default));
        assert!(matches!(UserHome::from_setting(Some("")), UserHome::Default));
        assert!(matches!(
            UserHome::from_setting(Some("/project/")),
            UserHome::Url(url) if url == "/project/"
        ));
        assert!(matches!(
            UserHome::from_setting(Some("app.home.user_home")),
            UserHome::Reference(path) if path == "app.home.user_home"
        ));
    }

    #[test]
    fn test_debug_hides_callable() {
        let home = UserHome::Callable(std::sync::Arc::new(|_: &panelkit_protocols::User| {
            "/".to_string()
        }));
        assert_eq!(format!("{home:?}"), "Callable(..)");
    }
}
