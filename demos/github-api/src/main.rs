//! GitHub API demo
//!
//! Describes a few GitHub endpoints as a [`Target`] and calls them through a
//! stubbed [`Provider`], so it runs without network access.

#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use futures_util::stream;
use tether::prelude::*;
use tether::TransportError;

/// A GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub full_name: String,
    pub stargazers_count: u32,
}

/// A GitHub contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub contributions: u32,
}

/// Endpoints of the GitHub API used by this demo.
#[derive(Debug, Clone)]
pub enum Route {
    Repo { owner: String, repo: String },
    Contributors { owner: String, repo: String },
    Star { owner: String, repo: String },
}

/// A [`Route`] on a given API host.
#[derive(Debug, Clone)]
pub struct GitHub {
    base: Url,
    route: Route,
}

impl GitHub {
    pub fn new(base: &Url, route: Route) -> Self {
        Self {
            base: base.clone(),
            route,
        }
    }
}

impl Target for GitHub {
    fn base_url(&self) -> Url {
        self.base.clone()
    }

    fn path(&self) -> String {
        match &self.route {
            Route::Repo { owner, repo } => format!("/repos/{owner}/{repo}"),
            Route::Contributors { owner, repo } => format!("/repos/{owner}/{repo}/contributors"),
            Route::Star { owner, repo } => format!("/user/starred/{owner}/{repo}"),
        }
    }

    fn method(&self) -> Method {
        match self.route {
            Route::Star { .. } => Method::PUT,
            Route::Repo { .. } | Route::Contributors { .. } => Method::GET,
        }
    }

    fn task(&self) -> std::result::Result<Task, TransportError> {
        match self.route {
            Route::Contributors { .. } => Task::query(&[("per_page", 5)]),
            Route::Repo { .. } | Route::Star { .. } => Ok(Task::Plain),
        }
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![("Accept".to_string(), "application/vnd.github+json".to_string())]
    }

    fn sample_data(&self) -> Bytes {
        match self.route {
            Route::Repo { .. } => Bytes::from_static(
                br#"{"id":724712,"full_name":"rust-lang/rust","stargazers_count":100000}"#,
            ),
            Route::Contributors { .. } => Bytes::from_static(
                br#"[{"login":"bors","contributions":50000},{"login":"ralfj","contributions":3000}]"#,
            ),
            Route::Star { .. } => Bytes::new(),
        }
    }
}

fn repo(base: &Url, owner: &str, name: &str) -> GitHub {
    GitHub::new(
        base,
        Route::Repo {
            owner: owner.to_string(),
            repo: name.to_string(),
        },
    )
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("tether=debug")
        .init();

    let base = Url::parse("https://api.github.com")?;
    let transport = HyperTransport::builder()
        .with_logging()
        .with_access_token(|| std::env::var("GITHUB_TOKEN").unwrap_or_default())
        .build();
    let provider = Provider::<GitHub, _>::with_transport(transport)
        .stub(StubBehavior::Immediate)
        .throttle(std::time::Duration::from_millis(100));

    let rust: Repository = provider.request(&repo(&base, "rust-lang", "rust")).await?;
    println!("{} has {} stars", rust.full_name, rust.stargazers_count);

    let contributors: Vec<Contributor> = provider
        .request(&GitHub::new(
            &base,
            Route::Contributors {
                owner: "rust-lang".to_string(),
                repo: "rust".to_string(),
            },
        ))
        .await?;
    for contributor in &contributors {
        println!("{}: {}", contributor.login, contributor.contributions);
    }

    let starred = provider.request_callback::<NoContent, _>(
        GitHub::new(
            &base,
            Route::Star {
                owner: "rust-lang".to_string(),
                repo: "rust".to_string(),
            },
        ),
        |result| println!("starred: {}", result.is_ok()),
    );
    starred.join().await;

    let targets = stream::iter([
        repo(&base, "tokio-rs", "tokio"),
        repo(&base, "hyperium", "hyper"),
    ]);
    let mut repos = std::pin::pin!(provider.values::<Repository, _>(targets));
    while let Some(repository) = repos.next().await {
        println!("fetched {}", repository?.full_name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    use super::*;

    async fn server() -> (MockServer, Url) {
        let server = MockServer::start().await;
        let base = Url::parse(&server.uri()).expect("mock server URL");
        (server, base)
    }

    #[tokio::test]
    async fn contributors_are_decoded() {
        let (server, base) = server().await;
        Mock::given(method("GET"))
            .and(path("/repos/rust-lang/rust/contributors"))
            .and(query_param("per_page", "5"))
            .and(header("Accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(octocat()))
            .mount(&server)
            .await;

        let provider = Provider::<GitHub>::new();
        let target = GitHub::new(
            &base,
            Route::Contributors {
                owner: "rust-lang".to_string(),
                repo: "rust".to_string(),
            },
        );
        let contributors: Vec<Contributor> = provider.request(&target).await.expect("contributors");

        check!(contributors.len() == 1);
        check!(contributors.first().map(|c| c.login.as_str()) == Some("octocat"));
    }

    fn octocat() -> Vec<Contributor> {
        vec![Contributor {
            login: "octocat".to_string(),
            contributions: 42,
        }]
    }

    #[tokio::test]
    async fn unknown_repository_is_a_status_error() {
        let (server, base) = server().await;
        Mock::given(path("/repos/nobody/nothing"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#))
            .mount(&server)
            .await;

        let provider = Provider::<GitHub>::new();
        let result = provider
            .request::<Repository>(&repo(&base, "nobody", "nothing"))
            .await;

        let_assert!(Err(ApiError::StatusCode(404)) = result);
    }

    #[tokio::test]
    async fn star_accepts_no_content() {
        let (server, base) = server().await;
        Mock::given(method("PUT"))
            .and(path("/user/starred/rust-lang/rust"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let provider = Provider::<GitHub>::new();
        let target = GitHub::new(
            &base,
            Route::Star {
                owner: "rust-lang".to_string(),
                repo: "rust".to_string(),
            },
        );

        check!(provider.request::<NoContent>(&target).await == Ok(NoContent));
    }

    #[tokio::test]
    async fn stubbed_provider_uses_sample_data() {
        let base = Url::parse("http://127.0.0.1:1").expect("URL");
        let provider = Provider::<GitHub>::new().stub(StubBehavior::Immediate);

        let rust: Repository = provider
            .request(&repo(&base, "rust-lang", "rust"))
            .await
            .expect("sample");

        check!(rust.full_name == "rust-lang/rust");
    }
}
