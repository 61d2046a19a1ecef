use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::get,
    Form, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    error::StoreError,
    state::AppState,
    users::{
        dto::{LoginForm, SignupForm},
        repo_types::NewUser,
        services::{create_user, find_user_by_credentials},
    },
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/signup", get(signup_form).post(signup))
}

pub async fn login_form() -> Html<String> {
    views::login_page()
}

pub async fn signup_form() -> Html<String> {
    views::signup_page()
}

/// No session is issued: success only chooses the redirect target.
#[instrument(skip(state, form))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Redirect {
    let Some(form) = form.normalized() else {
        return Redirect::to("/login");
    };

    match find_user_by_credentials(state.store.as_ref(), &form.email, &form.password).await {
        Ok(Some(user)) => {
            info!(user_id = user.id, "user logged in");
            Redirect::to("/users")
        }
        Ok(None) => {
            warn!(email = %form.email, "login rejected");
            Redirect::to("/login")
        }
        Err(e) => {
            error!(error = %e, "login lookup failed");
            Redirect::to("/login")
        }
    }
}

#[instrument(skip(state, form))]
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Redirect {
    let Some(form) = form.normalized() else {
        return Redirect::to("/signup");
    };

    let user = NewUser {
        username: form.username,
        email: form.email,
        password: form.password,
    };
    match create_user(state.store.as_ref(), &user).await {
        Ok(id) => {
            info!(user_id = id, email = %user.email, "user registered");
            Redirect::to("/login")
        }
        Err(StoreError::UniqueViolation) => {
            warn!(email = %user.email, "email already registered");
            Redirect::to("/signup")
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            Redirect::to("/signup")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::app::build_app;
    use crate::app::test_support::{body_text, location, send, send_form};
    use crate::db::memory::{BrokenStore, MemoryStore};
    use crate::db::Store;
    use crate::state::AppState;

    #[tokio::test]
    async fn forms_render() {
        let app = build_app(AppState::fake(), "public");
        let resp = send(&app, "GET", "/login").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("action=\"/login\""));

        let resp = send(&app, "GET", "/signup").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("action=\"/signup\""));
    }

    #[tokio::test]
    async fn signup_then_login_lands_on_users() {
        let app = build_app(AppState::fake(), "public");

        let resp = send_form(
            &app,
            "POST",
            "/signup",
            "username=+Ada+&email=+Ada%40Example.com&password=pw1",
        )
        .await;
        assert_eq!(location(&resp), "/login");

        let resp = send_form(&app, "POST", "/login", "email=ADA%40example.com+&password=pw1").await;
        assert_eq!(location(&resp), "/users");

        let resp = send_form(&app, "POST", "/login", "email=ada%40example.com&password=PW1").await;
        assert_eq!(location(&resp), "/login");
    }

    #[tokio::test]
    async fn signup_is_case_insensitive_on_email() {
        let store = Arc::new(MemoryStore::default());
        let app = build_app(AppState::new(store.clone()), "public");

        let first = send_form(&app, "POST", "/signup", "username=a&email=A%40x.com&password=p").await;
        assert_eq!(location(&first), "/login");

        let second = send_form(&app, "POST", "/signup", "username=b&email=a%40x.com&password=q").await;
        assert_eq!(location(&second), "/signup");

        let user = store
            .find_user_by_email("a@x.com")
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(user.username, "a");
    }

    #[tokio::test]
    async fn blank_fields_bounce_back() {
        let app = build_app(AppState::fake(), "public");

        let resp = send_form(&app, "POST", "/signup", "username=+++&email=a%40x.com&password=p").await;
        assert_eq!(location(&resp), "/signup");

        let resp = send_form(&app, "POST", "/signup", "email=a%40x.com").await;
        assert_eq!(location(&resp), "/signup");

        let resp = send_form(&app, "POST", "/login", "email=+&password=p").await;
        assert_eq!(location(&resp), "/login");
    }

    #[tokio::test]
    async fn store_failure_redirects_without_detail() {
        let app = build_app(AppState::new(Arc::new(BrokenStore)), "public");

        let resp = send_form(&app, "POST", "/signup", "username=a&email=a%40x.com&password=p").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/signup");

        let resp = send_form(&app, "POST", "/login", "email=a%40x.com&password=p").await;
        assert_eq!(location(&resp), "/login");
    }
}
