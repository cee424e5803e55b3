use std::{io, path::PathBuf, sync::Arc};

use anyhow::anyhow;
use clap::{CommandFactory, FromArgMatches, Parser};
use log::{debug, error, info, warn};

use crate::{
    Config, FetchError, GITHUB_GRAPHQL_ENDPOINT, GraphQlFetcher, ItemHandler, PageFetcher,
    ReportEntry, ReportPrinter, SequentialPaginator, StdResult, default_config_path,
};

/// Command line arguments shared by the listing tools
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// GitHub API token (overrides the token of the configuration file)
    #[arg(short, long, env = "GITHUB_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path of the JSON configuration file (defaults to ~/.config/ghutils/config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of items fetched per request
    #[arg(short = 'n', long, default_value_t = 100, value_parser = clap::value_parser!(u16).range(1..))]
    pub page_size: u16,

    /// GitHub GraphQL endpoint
    #[arg(long, default_value = GITHUB_GRAPHQL_ENDPOINT)]
    pub endpoint: String,

    /// Users whose collections are listed
    #[arg(value_name = "USERNAME")]
    pub users: Vec<String>,
}

impl Args {
    /// Parses the process arguments, presenting the command under the given name.
    pub fn parse_for(bin_name: &'static str, about: &'static str) -> Self {
        let matches = Self::command().name(bin_name).about(about).get_matches();

        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }
}

/// Lists the collections of the given users one after the other.
///
/// A failed fetch is logged and the next user is processed, except for
/// authentication failures which stop the listing. Handler failures stop it too.
pub async fn list_subjects<T>(
    paginator: &SequentialPaginator<T>,
    subjects: &[String],
    handler: &mut dyn ItemHandler<T>,
) -> StdResult<u32>
where
    T: ReportEntry + Send + Sync + 'static,
{
    if subjects.is_empty() {
        warn!("No user given, nothing to list");
        return Ok(0);
    }

    let mut total_fetched = 0;
    let mut failed_subjects = vec![];
    for subject in subjects {
        info!("Listing {} of {subject}", T::COLLECTION);
        match paginator.fetch_all(subject, handler).await {
            Ok(fetched) => {
                handler.finish()?;
                total_fetched += fetched;
            }
            Err(e) => match e.downcast_ref::<FetchError>() {
                Some(FetchError::Auth(_)) | None => return Err(e),
                Some(_) => {
                    handler.finish()?;
                    error!("Failed to list {} of {subject}: {e}", T::COLLECTION);
                    failed_subjects.push(subject.as_str());
                }
            },
        }
    }

    if !failed_subjects.is_empty() {
        return Err(anyhow!(
            "Failed to list {} of {}/{} users: {}",
            T::COLLECTION,
            failed_subjects.len(),
            subjects.len(),
            failed_subjects.join(", ")
        ));
    }

    Ok(total_fetched)
}

/// Resolves the configuration and prints the collections of the requested users to stdout.
pub async fn run<T>(args: Args) -> StdResult<()>
where
    T: ReportEntry + Send + Sync + 'static,
    GraphQlFetcher: PageFetcher<T>,
{
    let config_path = match &args.config {
        Some(path) => path.to_owned(),
        None => default_config_path()?,
    };
    let config = Config::resolve(
        args.token.clone(),
        &config_path,
        &args.endpoint,
        args.page_size,
    )?;
    debug!("Resolved {config:?}");

    let fetcher: Arc<dyn PageFetcher<T>> =
        Arc::new(GraphQlFetcher::new(config.endpoint(), config.token()));
    let paginator = SequentialPaginator::new(fetcher, config.page_size());
    let mut printer = ReportPrinter::new(io::stdout());
    let total_fetched = list_subjects(&paginator, &args.users, &mut printer).await?;
    info!("Listed {total_fetched} {}", T::COLLECTION);

    Ok(())
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use mockall::predicate::eq;
    use serde_json::json;

    use crate::{Edge, MockPageFetcher, Page, PageInfo, PageRequest, Repository};

    use super::*;

    fn single_page(url: &str) -> Page<Repository> {
        Page::new(
            1,
            vec![Edge::new("c1", Repository::dummy(url))],
            PageInfo::default(),
        )
    }

    fn subjects(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn list_subjects_without_subject_fetches_nothing() {
        let fetcher = MockPageFetcher::<Repository>::new();
        let paginator = SequentialPaginator::new(Arc::new(fetcher), 100);
        let mut printer = ReportPrinter::new(Vec::new());

        let total_fetched = list_subjects(&paginator, &[], &mut printer).await.unwrap();

        assert_eq!(0, total_fetched);
        assert!(printer.into_inner().is_empty());
    }

    #[tokio::test]
    async fn list_subjects_prints_each_subject_in_turn() {
        let fetcher = {
            let mut fetcher = MockPageFetcher::<Repository>::new();
            fetcher
                .expect_fetch()
                .with(eq(PageRequest::new("alice", 100, None)))
                .returning(|_| Ok(single_page("https://github.com/alice/repo")))
                .times(1);
            fetcher
                .expect_fetch()
                .with(eq(PageRequest::new("bob", 100, None)))
                .returning(|_| Ok(single_page("https://github.com/bob/repo")))
                .times(1);

            fetcher
        };
        let paginator = SequentialPaginator::new(Arc::new(fetcher), 100);
        let mut printer = ReportPrinter::new(Vec::new());

        let total_fetched = list_subjects(&paginator, &subjects(&["alice", "bob"]), &mut printer)
            .await
            .unwrap();

        assert_eq!(2, total_fetched);
        let output = String::from_utf8(printer.into_inner()).unwrap();
        let alice_position = output.find("https://github.com/alice/repo").unwrap();
        let bob_position = output.find("https://github.com/bob/repo").unwrap();
        assert!(alice_position < bob_position);
        assert_eq!(4, output.matches(&"-".repeat(40)).count());
    }

    #[tokio::test]
    async fn list_subjects_continues_after_remote_error_and_reports_failure() {
        let fetcher = {
            let mut fetcher = MockPageFetcher::<Repository>::new();
            fetcher
                .expect_fetch()
                .with(eq(PageRequest::new("nobody", 100, None)))
                .returning(|_| Err(FetchError::Remote("unknown user".to_string())))
                .times(1);
            fetcher
                .expect_fetch()
                .with(eq(PageRequest::new("bob", 100, None)))
                .returning(|_| Ok(single_page("https://github.com/bob/repo")))
                .times(1);

            fetcher
        };
        let paginator = SequentialPaginator::new(Arc::new(fetcher), 100);
        let mut printer = ReportPrinter::new(Vec::new());

        let error = list_subjects(&paginator, &subjects(&["nobody", "bob"]), &mut printer)
            .await
            .expect_err("Listing should fail if one user fails");

        assert!(error.to_string().contains("nobody"));
        let output = String::from_utf8(printer.into_inner()).unwrap();
        assert!(output.contains("https://github.com/bob/repo"));
    }

    #[tokio::test]
    async fn list_subjects_stops_on_auth_error() {
        let fetcher = {
            let mut fetcher = MockPageFetcher::<Repository>::new();
            fetcher
                .expect_fetch()
                .with(eq(PageRequest::new("alice", 100, None)))
                .returning(|_| Err(FetchError::Auth("Bad credentials".to_string())))
                .times(1);

            fetcher
        };
        let paginator = SequentialPaginator::new(Arc::new(fetcher), 100);
        let mut printer = ReportPrinter::new(Vec::new());

        let error = list_subjects(&paginator, &subjects(&["alice", "bob"]), &mut printer)
            .await
            .expect_err("Listing should stop on authentication error");

        assert!(matches!(
            error.downcast_ref::<FetchError>(),
            Some(FetchError::Auth(_))
        ));
    }

    fn repository_page(
        urls_and_cursors: &[(&str, &str)],
        has_next_page: bool,
    ) -> serde_json::Value {
        let edges = urls_and_cursors
            .iter()
            .map(|(url, cursor)| {
                json!({
                    "cursor": cursor,
                    "node": {
                        "isPrivate": false,
                        "isFork": false,
                        "description": "dummy",
                        "url": url,
                        "diskUsage": 42,
                        "forkCount": 1,
                        "stargazerCount": 10,
                        "watchers": { "totalCount": 2 },
                        "createdAt": "2021-01-02T03:04:05Z",
                        "updatedAt": "2022-01-02T03:04:05Z"
                    }
                })
            })
            .collect::<Vec<_>>();

        json!({
            "data": {
                "user": {
                    "repositories": {
                        "totalCount": 3,
                        "edges": edges,
                        "pageInfo": {
                            "hasPreviousPage": false,
                            "hasNextPage": has_next_page
                        }
                    }
                }
            }
        })
    }

    #[tokio::test]
    async fn list_subjects_pages_through_graphql_endpoint() {
        let server = MockServer::start();
        let first_page_mock = server.mock(|when, then| {
            when.method("POST")
                .path("/")
                .body_contains(r#""variables":{"user":"alice","first":2}"#);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(repository_page(
                    &[
                        ("https://github.com/alice/item1", "c1"),
                        ("https://github.com/alice/item2", "c2"),
                    ],
                    true,
                ));
        });
        let second_page_mock = server.mock(|when, then| {
            when.method("POST")
                .path("/")
                .body_contains(r#""variables":{"user":"alice","first":2,"after":"c2"}"#);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(repository_page(
                    &[("https://github.com/alice/item3", "c3")],
                    false,
                ));
        });
        let fetcher: Arc<dyn PageFetcher<Repository>> =
            Arc::new(GraphQlFetcher::new(&server.url("/"), "credentials"));
        let paginator = SequentialPaginator::new(fetcher, 2);
        let mut printer = ReportPrinter::new(Vec::new());

        let total_fetched = list_subjects(&paginator, &subjects(&["alice"]), &mut printer)
            .await
            .unwrap();

        first_page_mock.assert();
        second_page_mock.assert();
        assert_eq!(3, total_fetched);
        let output = String::from_utf8(printer.into_inner()).unwrap();
        let urls = output
            .lines()
            .filter_map(|line| line.strip_prefix("url             : "))
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                "https://github.com/alice/item1",
                "https://github.com/alice/item2",
                "https://github.com/alice/item3"
            ],
            urls
        );
    }

    #[tokio::test]
    async fn list_subjects_stops_when_server_rejects_credentials() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST").path("/");
            then.status(401)
                .header("Content-Type", "application/json")
                .json_body(json!({ "message": "Bad credentials" }));
        });
        let fetcher: Arc<dyn PageFetcher<Repository>> =
            Arc::new(GraphQlFetcher::new(&server.url("/"), "wrong"));
        let paginator = SequentialPaginator::new(fetcher, 100);
        let mut printer = ReportPrinter::new(Vec::new());

        let error = list_subjects(&paginator, &subjects(&["alice", "bob"]), &mut printer)
            .await
            .expect_err("Listing should stop when credentials are rejected");

        mock.assert_hits(1);
        assert!(matches!(
            error.downcast_ref::<FetchError>(),
            Some(FetchError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn list_subjects_closes_partial_report_of_failed_subject() {
        let fetcher = {
            let mut fetcher = MockPageFetcher::<Repository>::new();
            fetcher
                .expect_fetch()
                .with(eq(PageRequest::new("alice", 100, None)))
                .returning(|_| {
                    Ok(Page::new(
                        2,
                        vec![Edge::new(
                            "c1",
                            Repository::dummy("https://github.com/alice/repo"),
                        )],
                        PageInfo {
                            has_next_page: true,
                            has_previous_page: false,
                        },
                    ))
                })
                .times(1);
            fetcher
                .expect_fetch()
                .with(eq(PageRequest::new("alice", 100, Some("c1".to_string()))))
                .returning(|_| Err(FetchError::Transport("connection reset".to_string())))
                .times(1);
            fetcher
                .expect_fetch()
                .with(eq(PageRequest::new("bob", 100, None)))
                .returning(|_| Ok(single_page("https://github.com/bob/repo")))
                .times(1);

            fetcher
        };
        let paginator = SequentialPaginator::new(Arc::new(fetcher), 100);
        let mut printer = ReportPrinter::new(Vec::new());

        list_subjects(&paginator, &subjects(&["alice", "bob"]), &mut printer)
            .await
            .expect_err("Listing should fail if one user fails");

        let output = String::from_utf8(printer.into_inner()).unwrap();
        let separator = "-".repeat(40);
        assert_eq!(4, output.matches(&separator).count());
        let bob_block = output.find("https://github.com/bob/repo").unwrap();
        let before_bob = &output[..bob_block];
        assert!(before_bob.contains(&format!("2022-01-02T03:04:05Z\n{separator}\n{separator}\n")));
    }

    #[tokio::test]
    async fn run_fails_without_token() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = Args {
            token: None,
            config: Some(dir.path().join("config.json")),
            page_size: 100,
            endpoint: GITHUB_GRAPHQL_ENDPOINT.to_string(),
            users: subjects(&["alice"]),
        };

        let error = run::<Repository>(args)
            .await
            .expect_err("Run should fail without token");

        assert!(matches!(
            error.downcast_ref::<FetchError>(),
            Some(FetchError::Auth(_))
        ));
    }

    #[test]
    fn args_reject_zero_page_size() {
        Args::try_parse_from(["ghlist", "--page-size", "0", "alice"])
            .expect_err("Page size must be positive");
    }

    #[test]
    fn args_accept_users_and_token() {
        let args = Args::try_parse_from(["ghlist", "-t", "secret", "alice", "bob"]).unwrap();

        assert_eq!(Some("secret".to_string()), args.token);
        assert_eq!(subjects(&["alice", "bob"]), args.users);
        assert_eq!(100, args.page_size);
    }
}
