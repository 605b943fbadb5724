// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::ContentId;
use crate::model::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Categories,
    Detail(ContentId),
}

impl Route {
    pub const fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Dashboard => "dashboard",
            Self::Categories => "categories",
            Self::Detail(_) => "detail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub route: Route,
    pub session: Option<Session>,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::Login,
            session: None,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Navigate(Route),
    SessionEstablished(Session),
    /// The session check failed on a protected route; drop straight back
    /// to the login view with no protected content shown.
    SessionLost,
    Logout,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    RouteChanged(Route),
    SessionChanged,
    NavigationDenied(Route),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Navigate(route) => self.navigate(route),
            AppCommand::SessionEstablished(session) => {
                self.session = Some(session);
                vec![AppEvent::SessionChanged]
            }
            AppCommand::SessionLost => {
                self.session = None;
                self.route = Route::Login;
                vec![
                    AppEvent::SessionChanged,
                    AppEvent::RouteChanged(Route::Login),
                ]
            }
            AppCommand::Logout => {
                self.session = None;
                self.route = Route::Login;
                vec![
                    AppEvent::SessionChanged,
                    AppEvent::RouteChanged(Route::Login),
                    self.set_status("logged out"),
                ]
            }
            AppCommand::SetStatus(message) => {
                vec![self.set_status(&message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn navigate(&mut self, route: Route) -> Vec<AppEvent> {
        if route.is_protected() && self.session.is_none() {
            self.route = Route::Login;
            return vec![
                AppEvent::NavigationDenied(route),
                AppEvent::RouteChanged(Route::Login),
            ];
        }

        // Category administration is admin-only.
        if route == Route::Categories
            && !self.session.as_ref().is_some_and(Session::is_admin)
        {
            return vec![
                AppEvent::NavigationDenied(route),
                self.set_status("categories requires the admin role"),
            ];
        }

        self.route = route.clone();
        vec![AppEvent::RouteChanged(route)]
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, Route};
    use crate::ids::ContentId;
    use crate::model::Session;

    fn admin_session() -> Session {
        Session {
            username: "ops".to_owned(),
            role: "admin".to_owned(),
        }
    }

    fn analyst_session() -> Session {
        Session {
            username: "ana".to_owned(),
            role: "analyst".to_owned(),
        }
    }

    #[test]
    fn protected_navigation_without_session_lands_on_login() {
        let mut state = AppState::default();

        let events = state.dispatch(AppCommand::Navigate(Route::Dashboard));
        assert_eq!(state.route, Route::Login);
        assert_eq!(
            events,
            vec![
                AppEvent::NavigationDenied(Route::Dashboard),
                AppEvent::RouteChanged(Route::Login),
            ],
        );
    }

    #[test]
    fn session_lost_always_redirects_to_login() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SessionEstablished(admin_session()));
        state.dispatch(AppCommand::Navigate(Route::Dashboard));

        let events = state.dispatch(AppCommand::SessionLost);
        assert_eq!(state.route, Route::Login);
        assert!(state.session.is_none());
        assert!(events.contains(&AppEvent::RouteChanged(Route::Login)));
    }

    #[test]
    fn categories_route_requires_admin_role() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SessionEstablished(analyst_session()));
        state.dispatch(AppCommand::Navigate(Route::Dashboard));

        let events = state.dispatch(AppCommand::Navigate(Route::Categories));
        assert_eq!(state.route, Route::Dashboard);
        assert!(matches!(
            events.first(),
            Some(AppEvent::NavigationDenied(Route::Categories))
        ));
    }

    #[test]
    fn admin_reaches_categories() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SessionEstablished(admin_session()));

        let events = state.dispatch(AppCommand::Navigate(Route::Categories));
        assert_eq!(state.route, Route::Categories);
        assert_eq!(events, vec![AppEvent::RouteChanged(Route::Categories)]);
    }

    #[test]
    fn detail_route_carries_the_content_id() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SessionEstablished(analyst_session()));

        let id = ContentId::new("c-7");
        state.dispatch(AppCommand::Navigate(Route::Detail(id.clone())));
        assert_eq!(state.route, Route::Detail(id));
    }

    #[test]
    fn logout_clears_session_and_routes_to_login() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SessionEstablished(admin_session()));
        state.dispatch(AppCommand::Navigate(Route::Dashboard));

        let events = state.dispatch(AppCommand::Logout);
        assert_eq!(state.route, Route::Login);
        assert!(state.session.is_none());
        assert!(events.contains(&AppEvent::StatusUpdated("logged out".to_owned())));
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = AppState::default();

        state.dispatch(AppCommand::SetStatus("loading".to_owned()));
        assert_eq!(state.status_line.as_deref(), Some("loading"));

        let events = state.dispatch(AppCommand::ClearStatus);
        assert!(state.status_line.is_none());
        assert_eq!(events, vec![AppEvent::StatusCleared]);
    }
}
