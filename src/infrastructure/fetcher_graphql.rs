#![allow(non_snake_case)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use gql_client::{Client, GraphQLError};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    Edge, FetchError, Gist, Page, PageFetcher, PageInfo, PageRequest, Repository,
};

/// The GraphQL production endpoint for GitHub.
pub const GITHUB_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const REPOSITORIES_QUERY: &str = r#"
query ($user: String!, $first: Int!, $after: String) {
  user(login: $user) {
    repositories(first: $first, after: $after) {
      totalCount
      edges {
        cursor
        node {
          isPrivate
          isFork
          description
          url
          diskUsage
          forkCount
          stargazerCount
          watchers(first: 0) {
            totalCount
          }
          createdAt
          updatedAt
        }
      }
      pageInfo {
        hasPreviousPage
        hasNextPage
      }
    }
  }
}
"#;

const GISTS_QUERY: &str = r#"
query ($user: String!, $first: Int!, $after: String) {
  user(login: $user) {
    gists(privacy: ALL, first: $first, after: $after) {
      totalCount
      edges {
        cursor
        node {
          isFork
          isPublic
          description
          url
          forks(first: 0) {
            totalCount
          }
          stargazerCount
          createdAt
          updatedAt
        }
      }
      pageInfo {
        hasPreviousPage
        hasNextPage
      }
    }
  }
}
"#;

/// Extracts the HTTP status of a non-success answer from a gql_client error message.
fn http_status(message: &str) -> Option<u16> {
    let (_, rest) = message.split_once("The response is [")?;
    let (status, _) = rest.split_once(']')?;

    status.parse().ok()
}

/// Whether an undecodable body is an HTTP error page rather than a GraphQL answer.
fn is_http_error_page(message: &str) -> bool {
    let message = message.to_lowercase();

    message.contains("<html") || message.contains("<!doctype html")
}

impl From<GraphQLError> for FetchError {
    fn from(error: GraphQLError) -> Self {
        let message = error.message().to_string();
        match http_status(&message) {
            Some(401 | 403) => return FetchError::Auth(message),
            Some(_) => return FetchError::Transport(message),
            None => {}
        }
        if message.contains("Bad credentials") {
            FetchError::Auth(message)
        } else if message.contains("Failed to parse response") {
            if is_http_error_page(&message) {
                FetchError::Transport(message)
            } else {
                FetchError::MalformedResponse(message)
            }
        } else if message.contains("Request failed") || message.contains("Can not get response")
        {
            FetchError::Transport(message)
        } else if let Some(errors) = error.json().filter(|errors| !errors.is_empty()) {
            FetchError::Remote(format!("{message}: {errors:?}"))
        } else {
            FetchError::Transport(message)
        }
    }
}

#[derive(Deserialize, Debug)]
struct RepositoriesQueryData {
    user: Option<RepositoriesOwner>,
}

#[derive(Deserialize, Debug)]
struct RepositoriesOwner {
    repositories: Connection<RepositoryNode>,
}

#[derive(Deserialize, Debug)]
struct GistsQueryData {
    user: Option<GistsOwner>,
}

#[derive(Deserialize, Debug)]
struct GistsOwner {
    gists: Connection<GistNode>,
}

#[derive(Deserialize, Debug)]
struct Connection<N> {
    totalCount: u32,
    edges: Vec<Option<ConnectionEdge<N>>>,
    pageInfo: PageInfoNode,
}

#[derive(Deserialize, Debug)]
struct ConnectionEdge<N> {
    cursor: String,
    node: N,
}

#[derive(Deserialize, Debug)]
struct PageInfoNode {
    hasPreviousPage: bool,
    hasNextPage: bool,
}

#[derive(Deserialize, Debug)]
struct TotalCount {
    totalCount: u32,
}

#[derive(Deserialize, Debug)]
struct RepositoryNode {
    isPrivate: bool,
    isFork: bool,
    description: Option<String>,
    url: String,
    diskUsage: Option<u64>,
    forkCount: u32,
    stargazerCount: u32,
    watchers: TotalCount,
    createdAt: DateTime<Utc>,
    updatedAt: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
struct GistNode {
    isFork: bool,
    isPublic: bool,
    description: Option<String>,
    url: String,
    forks: TotalCount,
    stargazerCount: u32,
    createdAt: DateTime<Utc>,
    updatedAt: DateTime<Utc>,
}

impl From<RepositoryNode> for Repository {
    fn from(node: RepositoryNode) -> Self {
        Self {
            is_private: node.isPrivate,
            is_fork: node.isFork,
            description: node.description,
            url: node.url,
            disk_usage: node.diskUsage,
            fork_count: node.forkCount,
            stargazer_count: node.stargazerCount,
            watcher_count: node.watchers.totalCount,
            created_at: node.createdAt,
            updated_at: node.updatedAt,
        }
    }
}

impl From<GistNode> for Gist {
    fn from(node: GistNode) -> Self {
        Self {
            is_public: node.isPublic,
            is_fork: node.isFork,
            description: node.description,
            url: node.url,
            fork_count: node.forks.totalCount,
            stargazer_count: node.stargazerCount,
            created_at: node.createdAt,
            updated_at: node.updatedAt,
        }
    }
}

impl<N, T> From<Connection<N>> for Page<T>
where
    N: Into<T>,
{
    fn from(connection: Connection<N>) -> Self {
        Page::new(
            connection.totalCount,
            connection
                .edges
                .into_iter()
                .flatten()
                .map(|edge| Edge::new(&edge.cursor, edge.node.into()))
                .collect(),
            PageInfo {
                has_next_page: connection.pageInfo.hasNextPage,
                has_previous_page: connection.pageInfo.hasPreviousPage,
            },
        )
    }
}

/// The variables of a paged GraphQL query on a user's collection.
#[derive(Debug, Serialize)]
struct GraphQlUserQuery {
    /// The login of the user.
    user: String,
    /// The number of items to return.
    first: u16,
    /// The cursor for pagination, omitted on the first page.
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<String>,
}

impl From<&PageRequest> for GraphQlUserQuery {
    fn from(request: &PageRequest) -> Self {
        Self {
            user: request.subject.to_owned(),
            first: request.first,
            after: request.after.to_owned(),
        }
    }
}

fn unknown_user(request: &PageRequest) -> FetchError {
    FetchError::Remote(format!(
        "Could not resolve to a User with the login of '{}'",
        request.subject
    ))
}

/// Fetches repositories and gists pages from a GraphQL API.
pub struct GraphQlFetcher {
    client: Client,
}

impl GraphQlFetcher {
    /// Creates a new `GraphQlFetcher` instance authenticated with the given token.
    pub fn new(endpoint: &str, token: &str) -> Self {
        let bearer_token = format!("Bearer {token}");
        let mut headers = HashMap::from([("User-Agent", USER_AGENT)]);
        headers.insert("Authorization", &bearer_token);
        let client = Client::new_with_headers(endpoint, headers);

        Self { client }
    }

    async fn query<K>(&self, query: &str, request: &PageRequest) -> Result<K, FetchError>
    where
        K: for<'de> Deserialize<'de>,
    {
        self.client
            .query_with_vars_unwrap::<K, GraphQlUserQuery>(query, request.into())
            .await
            .map_err(|e| {
                let e: FetchError = e.into();
                debug!("GraphQL query failed for {request}: {e}");
                e
            })
    }
}

#[async_trait::async_trait]
impl PageFetcher<Repository> for GraphQlFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<Page<Repository>, FetchError> {
        let fetched_data = self
            .query::<RepositoriesQueryData>(REPOSITORIES_QUERY, request)
            .await?;
        let owner = fetched_data.user.ok_or_else(|| unknown_user(request))?;

        Ok(owner.repositories.into())
    }
}

#[async_trait::async_trait]
impl PageFetcher<Gist> for GraphQlFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<Page<Gist>, FetchError> {
        let fetched_data = self.query::<GistsQueryData>(GISTS_QUERY, request).await?;
        let owner = fetched_data.user.ok_or_else(|| unknown_user(request))?;

        Ok(owner.gists.into())
    }
}
