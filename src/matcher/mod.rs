/// Decides which configured apps a foreground identity belongs to.
///
/// Entries are substrings compared case-insensitively; configured order is
/// preserved so the first configured entry wins when several match.
#[derive(Debug, Clone, Default)]
pub struct AppMatcher {
    // (configured name, lowercased pattern)
    apps: Vec<(String, String)>,
}

impl AppMatcher {
    pub fn new(apps_to_track: &[String]) -> Self {
        let apps = apps_to_track
            .iter()
            .map(|app| (app.clone(), app.to_lowercase()))
            .collect();

        Self { apps }
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// All configured apps whose pattern occurs in `identity`, in configured order.
    pub fn matching_apps(&self, identity: &str) -> Vec<&str> {
        let identity_lower = identity.to_lowercase();

        self.apps
            .iter()
            .filter(|(_, pattern)| identity_lower.contains(pattern.as_str()))
            .map(|(app, _)| app.as_str())
            .collect()
    }

    /// The app a tick should be attributed to, if any.
    pub fn first_match(&self, identity: &str) -> Option<&str> {
        let identity_lower = identity.to_lowercase();

        self.apps
            .iter()
            .find(|(_, pattern)| identity_lower.contains(pattern.as_str()))
            .map(|(app, _)| app.as_str())
    }
}
