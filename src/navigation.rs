//! Navigation collaborator
//!
//! The wizards never route on their own; they hand a route string to
//! whatever [`Navigator`] the hosting shell mounted them with.

/// Route of the login page
pub const LOGIN_ROUTE: &str = "/login";

/// Href of the static "back to login" link shown on the first step
pub const BACK_TO_LOGIN_HREF: &str = LOGIN_ROUTE;

/// Receives navigation intents from a wizard
pub trait Navigator: Send + Sync {
    /// Ask the hosting shell to show `route`
    fn navigate(&self, route: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, route: &str) {
        self(route)
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_closure_navigator() {
        let calls = AtomicUsize::new(0);
        let navigator = |route: &str| {
            assert_eq!(route, LOGIN_ROUTE);
            calls.fetch_add(1, Ordering::SeqCst);
        };
        navigator.navigate(LOGIN_ROUTE);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_back_link_points_at_login() {
        assert_eq!(BACK_TO_LOGIN_HREF, "/login");
    }
}
