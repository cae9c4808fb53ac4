//! Who is signed in, and which screens they may see.

use gymtrack_core::models::User;

use crate::storage::TokenStorage;

#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    user: Option<User>,
    loading: bool,
}

impl AuthContext {
    /// Starts from whatever the store remembers. A stored token still has
    /// to be confirmed by the backend, so the context begins loading.
    pub fn restore(tokens: &TokenStorage) -> Self {
        match tokens.access_token() {
            Some(_) => Self {
                user: tokens.user(),
                loading: true,
            },
            None => Self::default(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn signed_in(&mut self, user: User) {
        self.user = Some(user);
        self.loading = false;
    }

    pub fn signed_out(&mut self) {
        self.user = None;
        self.loading = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Plans,
    Tracker,
    History,
    Exercises,
    Profiles,
}

impl Route {
    pub fn is_guest_only(self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    pub fn is_protected(self) -> bool {
        !self.is_guest_only()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Auth state is still being confirmed.
    Wait,
    Allow,
    Redirect(Route),
}

pub fn guard(route: Route, auth: &AuthContext) -> Guard {
    if auth.is_loading() {
        return Guard::Wait;
    }
    match (route.is_protected(), auth.is_authenticated()) {
        (true, false) => Guard::Redirect(Route::Login),
        (false, true) => Guard::Redirect(Route::Plans),
        _ => Guard::Allow,
    }
}
