//! Library integration tests.

use peer_dep_helper::PeerDepError;

#[test]
fn error_types_are_public() {
    let err = PeerDepError::AllowListViolation {
        context: "apply fixes".into(),
        packages: vec!["react".into(), "vue".into()],
    };
    assert!(err.to_string().contains("react, vue"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> peer_dep_helper::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use peer_dep_helper::cli::{Cli, Commands};

    let cli = Cli::parse_from(["peer-dep-helper", "fix", "--only", "react", "--write"]);

    if let Commands::Fix(args) = cli.command {
        assert_eq!(args.only, vec!["react"]);
        assert!(args.write);
    } else {
        panic!("Expected Fix command");
    }
}

#[test]
fn strategies_round_trip_through_names() {
    use peer_dep_helper::resolver::Strategy;

    for strategy in Strategy::ALL {
        assert_eq!(strategy.as_str().parse::<Strategy>(), Ok(strategy));
    }
    assert!("newest".parse::<Strategy>().is_err());
}

#[test]
fn ranges_are_public() {
    use peer_dep_helper::range::{parse_version, VersionRange};

    let range = VersionRange::parse("^1.2.0 || ~2.0.0").unwrap();
    assert!(range.satisfies(&parse_version("1.9.0").unwrap()));
    assert!(range.satisfies(&parse_version("2.0.5").unwrap()));
    assert!(!range.satisfies(&parse_version("2.1.0").unwrap()));
}

#[test]
fn settings_resolve_from_layers() {
    use peer_dep_helper::config::{ConfigLayer, Settings};

    let file = ConfigLayer {
        only: Some(vec!["react".into()]),
        ..Default::default()
    };
    let settings = Settings::resolve([file]).unwrap();
    assert_eq!(settings.only, vec!["react"]);
    assert!(settings.cache);
}
