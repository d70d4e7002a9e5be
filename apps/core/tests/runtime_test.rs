use clap::Parser;
use kapetayo_core::catalog;
use kapetayo_core::config::Config;
use kapetayo_core::core_service::CafeService;
use kapetayo_core::model::PriceRange;
use kapetayo_core::runtime::{execute, serve, Cli, Command};
use kapetayo_core::store::MemoryStore;

fn test_service() -> CafeService {
    CafeService::with_parts(
        Config::default(),
        catalog::builtin().unwrap(),
        Box::new(MemoryStore::new()),
    )
    .unwrap()
}

fn run(service: &CafeService, args: &[&str]) -> String {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    execute(service, cli.command, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn parses_search_flags() {
    let cli = Cli::try_parse_from([
        "kapetayo-core",
        "--config",
        "custom.toml",
        "search",
        "river",
        "afford",
        "--price",
        "$",
        "--student",
    ])
    .unwrap();

    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("custom.toml")));
    match cli.command {
        Command::Search(args) => {
            assert_eq!(args.query, vec!["river", "afford"]);
            assert_eq!(args.price, Some(PriceRange::Budget));
            assert!(args.student);
            assert!(!args.json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_unknown_price_symbol() {
    assert!(Cli::try_parse_from(["kapetayo-core", "search", "--price", "cheap"]).is_err());
}

#[test]
fn search_prints_one_line_per_cafe() {
    let service = test_service();
    let output = run(&service, &["kapetayo-core", "search", "riversiide"]);

    assert_eq!(output.lines().count(), 1);
    assert!(output.starts_with("5\tRiverside Beans\t$\t"));
}

#[test]
fn search_without_results_prints_hint() {
    let service = test_service();
    let output = run(&service, &["kapetayo-core", "search", "xyz123"]);
    assert!(output.contains("No cafes found"));
}

#[test]
fn search_json_output_is_parseable() {
    let service = test_service();
    let output = run(&service, &["kapetayo-core", "search", "heritage", "--json"]);

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["id"], "3");
    assert_eq!(parsed[0]["bookmarked"], false);
}

#[test]
fn bookmark_command_toggles_and_marks_listing() {
    let service = test_service();

    let first = run(&service, &["kapetayo-core", "bookmark", "7"]);
    assert_eq!(first.trim(), "Tambayan Cafe bookmarked");

    let listing = run(&service, &["kapetayo-core", "bookmarks"]);
    assert!(listing.contains("Tambayan Cafe"));
    assert!(listing.contains("[bookmarked]"));

    let second = run(&service, &["kapetayo-core", "bookmark", "7"]);
    assert_eq!(second.trim(), "Tambayan Cafe removed from bookmarks");
}

#[test]
fn onboard_and_profile_commands() {
    let service = test_service();

    let before = run(&service, &["kapetayo-core", "profile"]);
    assert!(before.contains("No profile yet"));

    run(&service, &["kapetayo-core", "onboard", "--name", "Juan"]);
    let after = run(&service, &["kapetayo-core", "profile"]);
    assert!(after.contains("Juan"));
    assert!(after.contains("Marikina Explorer"));

    let reset = run(&service, &["kapetayo-core", "reset"]);
    assert_eq!(reset.trim(), "account data cleared");
}

#[test]
fn serve_answers_each_json_line() {
    let service = test_service();
    let input = concat!(
        "{\"kind\":\"ToggleBookmark\",\"payload\":{\"id\":\"2\"}}\n",
        "\n",
        "{\"kind\":\"Bookmarks\"}\n",
        "oops\n",
    );

    let mut out = Vec::new();
    serve(&service, input.as_bytes(), &mut out).unwrap();
    let output = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("\"active\":true"));
    assert!(lines[1].contains("The Brewroom"));
    assert!(lines[2].contains("invalid_json"));
}
