use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ghchangelog::services::Credentials;
use ghchangelog::{ChangelogGenerator, Config, GitHubClient};

fn issue(number: u64, title: &str, labels: &[&str], body: Option<&str>) -> serde_json::Value {
    json!({
        "number": number,
        "title": title,
        "html_url": format!("https://github.com/acme/widgets/issues/{number}"),
        "user": { "login": "reporter", "html_url": "https://github.com/reporter" },
        "labels": labels.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
        "body": body,
    })
}

fn pull_request(number: u64, title: &str, labels: &[&str], login: &str) -> serde_json::Value {
    json!({
        "number": number,
        "title": title,
        "html_url": format!("https://github.com/acme/widgets/pull/{number}"),
        "user": { "login": login, "html_url": format!("https://github.com/{login}") },
        "labels": labels.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
        "pull_request": { "html_url": format!("https://github.com/acme/widgets/pull/{number}") },
    })
}

const CONFIG: &str = r#"
changelog:
  repository: acme/widgets
  issues:
    excludes:
      labels: ["invalid"]
    ports:
      - label: "status: backported"
        body-expression: 'Backport of #(\d+)'
  contributors:
    exclude:
      names: ["dependabot[bot]"]
"#;

#[tokio::test]
async fn writes_changelog_for_milestone_title() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/milestones"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "number": 7, "title": "1.0.0" },
            { "number": 8, "title": "1.1.0" },
        ])))
        .mount(&server)
        .await;

    let next = format!(
        "<{}/repos/acme/widgets/issues?milestone=8&state=closed&page=2>; rel=\"next\"",
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/issues"))
        .and(query_param("milestone", "8"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            pull_request(4, "Bump serde", &["dependency-upgrade"], "dependabot[bot]"),
            issue(5, "Not a bug", &["bug", "invalid"], None),
            issue(
                6,
                "Document @Config usage",
                &["documentation", "status: backported"],
                Some("Backport of #40"),
            ),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/issues"))
        .and(query_param("milestone", "8"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", next.as_str())
                .set_body_json(json!([
                    issue(1, "Crash on <empty> input", &["type: bug"], None),
                    pull_request(2, "Add *fast* mode", &["enhancement"], "zoe"),
                    pull_request(3, "Add retries", &["enhancement"], "Adam"),
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/issues/40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pull_request(
            40,
            "Document @Config usage",
            &["documentation"],
            "writer",
        )))
        .mount(&server)
        .await;

    let config = Config::from_yaml(CONFIG).unwrap();
    let settings = config.changelog_settings(None).unwrap();
    let client = GitHubClient::new(&server.uri(), Credentials::Token("secret".into())).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("CHANGELOG.md");
    ChangelogGenerator::new(&client, settings)
        .generate("1.1.0", &output)
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "## :star: New Features\n\
         \n\
         - Add \\*fast\\* mode [#2](https://github.com/acme/widgets/pull/2)\n\
         - Add retries [#3](https://github.com/acme/widgets/pull/3)\n\
         \n\
         ## :lady_beetle: Bug Fixes\n\
         \n\
         - Crash on `<empty>` input [#1](https://github.com/acme/widgets/issues/1)\n\
         \n\
         ## :notebook_with_decorative_cover: Documentation\n\
         \n\
         - Document `@Config` usage [#6](https://github.com/acme/widgets/issues/6)\n\
         \n\
         ## :hammer: Dependency Upgrades\n\
         \n\
         - Bump serde [#4](https://github.com/acme/widgets/pull/4)\n\
         \n\
         ## :heart: Contributors\n\
         \n\
         Thank you to all the contributors who worked on this release:\n\
         \n\
         [@Adam](https://github.com/Adam), [@writer](https://github.com/writer), and [@zoe](https://github.com/zoe)\n"
    );
}

#[tokio::test]
async fn unknown_milestone_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/milestones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = Config::from_yaml(CONFIG).unwrap();
    let client = GitHubClient::new(&server.uri(), Credentials::Anonymous).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("CHANGELOG.md");

    let err = ChangelogGenerator::new(&client, config.changelog_settings(None).unwrap())
        .generate("2.0.0", &output)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Unable to find milestone with title '2.0.0'");
    assert!(!output.exists());
}
