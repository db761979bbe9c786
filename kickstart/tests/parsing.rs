use std::net::Ipv4Addr;

use indoc::indoc;

use kickstart::{
    commands::{
        network::{BootProto, DeviceReference, Network},
        partition::Partition,
    },
    parse_string, ErrorCategory, KickstartHandler, KsLineSource, Parser, Version,
};

fn collecting_parser() -> Parser {
    Parser::new(KickstartHandler::new(Version::F34)).errors_are_fatal(false)
}

#[test]
fn test_network_devices() {
    let text = indoc! {r#"
        network --bootproto=dhcp --device=eth0
        network --bootproto=static --device=eth1 --ip=10.0.0.2 --netmask=255.255.255.0 --gateway=10.0.0.1
    "#};

    let handler = parse_string(text, Version::F34).unwrap();
    let network = handler.command::<Network>().unwrap();
    assert_eq!(network.devices.len(), 2);

    let eth0 = &network.devices[0];
    assert_eq!(eth0.bootproto, Some(BootProto::Dhcp));
    assert_eq!(eth0.device, Some(DeviceReference::Name("eth0".into())));
    assert_eq!(eth0.line.lineno, 1);

    let eth1 = &network.devices[1];
    assert_eq!(eth1.bootproto, Some(BootProto::Static));
    assert_eq!(eth1.ip, Some(Ipv4Addr::new(10, 0, 0, 2)));
    assert_eq!(eth1.gateway, Some(Ipv4Addr::new(10, 0, 0, 1)));
    assert_eq!(eth1.line.lineno, 2);

    let output = handler.to_string();
    let eth0_at = output.find("--device=eth0").unwrap();
    let eth1_at = output.find("--device=eth1").unwrap();
    assert!(eth0_at < eth1_at);
}

#[test]
fn test_duplicate_detection() {
    let text = indoc! {r#"
        network --bootproto=dhcp --device=eth0
        part /home --size=100
        network --bootproto=static --device=eth0 --ip=10.0.0.2 --netmask=255.255.255.0
        part /home --size=200
    "#};

    let mut parser = Parser::new(KickstartHandler::new(Version::F34));
    parser.read_kickstart_from_string(text, true).unwrap();

    let warnings = parser.warnings();
    assert_eq!(warnings.len(), 2);
    assert!(warnings
        .iter()
        .all(|w| w.category() == ErrorCategory::Duplicate));
    assert_eq!(warnings[0].line.lineno, 3);
    assert_eq!(warnings[1].line.lineno, 4);

    // Both definitions are retained
    let handler = parser.handler();
    assert_eq!(handler.command::<Network>().unwrap().devices.len(), 2);
    assert_eq!(handler.command::<Partition>().unwrap().partitions.len(), 2);

    // Escalated warnings stop the parse
    let mut strict = Parser::new(KickstartHandler::new(Version::F34)).warnings_are_errors(true);
    let err = strict.read_kickstart_from_string(text, true).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Duplicate);
}

#[test]
fn test_error_accumulation() {
    let text = indoc! {r#"
        skipx
        part / --size=big
        frobnicate --now
        %frob
        ignored body
        %end
        zerombr
        network --device=eth0 --bootproto=carrier-pigeon
    "#};

    let mut parser = collecting_parser();
    parser.read_kickstart_from_string(text, true).unwrap();

    let lines: Vec<_> = parser.errors().iter().map(|e| e.line.lineno).collect();
    assert_eq!(lines, vec![2, 3, 4, 8]);
    let categories: Vec<_> = parser.errors().iter().map(|e| e.category()).collect();
    assert_eq!(
        categories,
        vec![
            ErrorCategory::Value,
            ErrorCategory::Parse,
            ErrorCategory::Parse,
            ErrorCategory::Value
        ]
    );

    // The good lines around the errors still count
    let output = parser.handler().to_string();
    assert!(output.contains("skipx\n"));
    assert!(output.contains("zerombr\n"));
    assert!(!output.contains("ignored body"));
}

#[test]
fn test_tolerated_unknowns() {
    let text = indoc! {r#"
        frobnicate --now
        %frob --fast
        kept body
        %end
        skipx
    "#};

    let mut parser = Parser::new(KickstartHandler::new(Version::F34))
        .unknown_commands_are_fatal(false)
        .unknown_sections_are_fatal(false);
    parser.read_kickstart_from_string(text, true).unwrap();

    assert_eq!(parser.error_count(), 0);
    assert_eq!(parser.warnings().len(), 2);
    assert!(parser
        .warnings()
        .iter()
        .all(|w| w.category() == ErrorCategory::Warning));

    let output = parser.handler().to_string();
    assert!(output.contains("\n%frob --fast\nkept body\n%end\n"), "{output}");
    assert!(!output.contains("frobnicate"));
}

#[test]
fn test_include_line_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let inner = dir.path().join("inner.ks");
    std::fs::write(&inner, "zerombr\nbad-inner\n").unwrap();

    let root = dir.path().join("root.ks");
    std::fs::write(
        &root,
        indoc! {r#"
            skipx
            %include inner.ks
            bad-outer
        "#},
    )
    .unwrap();

    let mut parser = collecting_parser();
    parser.read_kickstart(root.to_str().unwrap(), true).unwrap();

    let errors = parser.errors();
    assert_eq!(errors.len(), 2);

    assert_eq!(errors[0].line.raw, "bad-inner");
    assert_eq!(errors[0].line.lineno, 2);
    match &errors[0].line.source {
        KsLineSource::Include(location, directive) => {
            assert_eq!(location, inner.to_str().unwrap());
            assert_eq!(directive.lineno, 2);
            assert_eq!(
                directive.source,
                KsLineSource::File(root.to_str().unwrap().to_string())
            );
        }
        other => panic!("Wrong source: {other:?}"),
    }

    assert_eq!(errors[1].line.raw, "bad-outer");
    assert_eq!(errors[1].line.lineno, 3);
    assert_eq!(
        errors[1].line.source,
        KsLineSource::File(root.to_str().unwrap().to_string())
    );

    assert!(parser.handler().to_string().contains("zerombr\n"));
}

#[test]
fn test_ksappend_spliced_before_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let appended = dir.path().join("append.ks");
    std::fs::write(&appended, "%post\necho appended\n%end\n").unwrap();

    let text = format!("skipx\n%ksappend {}\n", appended.display());
    let handler = parse_string(&text, Version::F34).unwrap();
    assert_eq!(handler.scripts.len(), 1);
    assert_eq!(handler.scripts[0].body, "echo appended\n");
    assert_eq!(handler.scripts[0].line.lineno, 1);
    assert!(matches!(
        handler.scripts[0].line.source,
        KsLineSource::KsAppend(..)
    ));
}

#[test]
fn test_repeated_reads_accumulate() {
    let mut parser = Parser::new(KickstartHandler::new(Version::F34));
    parser
        .read_kickstart_from_string("part / --size=1\n", true)
        .unwrap();
    parser
        .read_kickstart_from_string("part /home --size=1\n", false)
        .unwrap();
    assert_eq!(
        parser
            .handler()
            .command::<Partition>()
            .unwrap()
            .partitions
            .len(),
        2
    );

    parser
        .read_kickstart_from_string("part /var --size=1\n", true)
        .unwrap();
    assert_eq!(
        parser
            .handler()
            .command::<Partition>()
            .unwrap()
            .partitions
            .len(),
        1
    );
}
