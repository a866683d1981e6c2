use super::*;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["foodfinder-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["foodfinder-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn parses_db_seed_command_with_file() {
    let cli = Cli::try_parse_from(["foodfinder-cli", "db", "seed", "--file", "zomato.csv"])
        .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Db {
            command: DbCommands::Seed { file, dry_run },
        }) => {
            assert_eq!(file, std::path::PathBuf::from("zomato.csv"));
            assert!(!dry_run);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn db_seed_requires_file() {
    assert!(Cli::try_parse_from(["foodfinder-cli", "db", "seed"]).is_err());
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["foodfinder-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_query_filters() {
    let cli = Cli::try_parse_from([
        "foodfinder-cli",
        "query",
        "--min-rating",
        "4.0",
        "--city",
        "Mumbai",
        "--max-cost",
        "1000",
        "--all",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Query(args)) => {
            assert_eq!(args.min_rating.as_deref(), Some("4.0"));
            assert_eq!(args.city.as_deref(), Some("Mumbai"));
            assert_eq!(args.max_cost.as_deref(), Some("1000"));
            assert!(args.all);
            assert!(!args.report);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn query_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "foodfinder-cli",
        "query",
        "--lat",
        "-33.86",
        "--lng",
        "151.2",
        "--radius",
        "10",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Query(args)) => assert_eq!(args.lat.as_deref(), Some("-33.86")),
        other => panic!("unexpected command: {other:?}"),
    }
}
