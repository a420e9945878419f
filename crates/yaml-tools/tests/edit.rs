use commented_yaml::{Node, PrintOptions, parse_document, print_document};
use pretty_assertions::assert_eq;
use yaml_tools::{Error, NodePath, comment_out, delete, resolve};

const CHECKS: &str = "# settings
test:
  foo:
    h:
    # first
    - check: a
    # second
    - check: b
      ef: 2
    # third
    - check: c # last
      ef: 3
";

#[test]
fn deleting_an_item_shifts_comments_with_their_items() {
    let mut document = parse_document(CHECKS).expect("parse");
    let removed = delete(&mut document.root, &NodePath::parse("test.foo.h[1]")).expect("delete");
    assert_eq!(removed.lines, ["# second"]);

    let h = resolve(&document.root, &NodePath::parse("test.foo.h"))
        .ok()
        .and_then(Node::as_sequence)
        .expect("h");
    assert_eq!(h.len(), 2);
    assert_eq!(h.items[1].leading.lines, ["# third"]);
    assert_eq!(
        resolve(&document.root, &NodePath::parse("test.foo.h[1].check")),
        Ok(&Node::plain("c"))
    );
}

#[test]
fn failed_deletes_name_the_path() {
    let mut document = parse_document(CHECKS).expect("parse");
    let cases = [
        (
            "unknownKey1.foo",
            Error::KeyNotFound {
                path: NodePath::root(),
                key: "unknownKey1".into(),
            },
        ),
        (
            "test.foo.0.check",
            Error::KeyNotFound {
                path: NodePath::parse("test.foo"),
                key: "0".into(),
            },
        ),
        (
            "test.foo.h.1000",
            Error::IndexOutOfRange {
                path: NodePath::parse("test.foo.h"),
                index: 1000,
                length: 3,
            },
        ),
        (
            "test.foo.unknownKey2.0",
            Error::KeyNotFound {
                path: NodePath::parse("test.foo"),
                key: "unknownKey2".into(),
            },
        ),
        (
            "test.foo.h.2.unknownKey3",
            Error::KeyNotFound {
                path: NodePath::parse("test.foo.h[2]"),
                key: "unknownKey3".into(),
            },
        ),
    ];
    for (path, expected) in cases {
        assert_eq!(
            delete(&mut document.root, &NodePath::parse(path)),
            Err(expected),
            "{path}"
        );
    }
}

#[test]
fn commented_out_key_reads_back_as_comment_lines() {
    let input = "# service
server:
  host: localhost
  # tls settings
  tls:
    cert: a.pem # rotated yearly
    ciphers:
    - modern
  port: 80
";
    let mut document = parse_document(input).expect("parse");
    let options = PrintOptions::default();
    comment_out(&mut document.root, &NodePath::parse("server.tls"), &options).expect("comment");
    let output = print_document(&document, &options);

    insta::assert_snapshot!(output, @r"
    # service
    server:
      host: localhost
      # tls settings
      #tls:
      #  cert: a.pem # rotated yearly
      #  ciphers:
      #  - modern
      port: 80
    ");

    let reparsed = parse_document(&output).expect("reparse");
    let server = resolve(&reparsed.root, &NodePath::parse("server"))
        .ok()
        .and_then(Node::as_mapping)
        .expect("server");
    assert!(!server.contains_key("tls"));
    assert_eq!(server.keys().collect::<Vec<_>>(), ["host", "port"]);
}

#[test]
fn comment_out_follows_the_layout() {
    let input = "a:\n  b:\n    c: 1\n    d:\n    - x\n  e: 2\n";
    let mut document = parse_document(input).expect("parse");
    let options = PrintOptions {
        indent: 4,
        sequence_indent: 2,
    };
    comment_out(&mut document.root, &NodePath::parse("a.b"), &options).expect("comment");
    insta::assert_snapshot!(print_document(&document, &options), @r"
    a:
        #b:
        #    c: 1
        #    d:
        #      - x
        e: 2
    ");
}

#[test]
fn commenting_out_the_last_item() {
    let mut document = parse_document("list:\n- a\n- b: 1\n  c: 2\n# end\n").expect("parse");
    comment_out(
        &mut document.root,
        &NodePath::parse("list[1]"),
        &PrintOptions::default(),
    )
    .expect("comment");
    assert_eq!(
        print_document(&document, &PrintOptions::default()),
        "list:\n- a\n#- b: 1\n#  c: 2\n# end\n"
    );
}

#[test]
fn commenting_out_a_block_scalar_keeps_its_lines() {
    let mut document =
        parse_document("script: |\n  echo one\n\n  echo two\nnext: 1\n").expect("parse");
    comment_out(
        &mut document.root,
        &NodePath::parse("script"),
        &PrintOptions::default(),
    )
    .expect("comment");
    assert_eq!(
        print_document(&document, &PrintOptions::default()),
        "#script: |\n#  echo one\n#\n#  echo two\nnext: 1\n"
    );
}

fn comment_out_and_reprint(input: &str, path: &str) -> (String, String) {
    let options = PrintOptions::default();
    let mut document = parse_document(input).expect("parse");
    comment_out(&mut document.root, &NodePath::parse(path), &options).expect("comment");
    let output = print_document(&document, &options);
    let reprinted = print_document(&parse_document(&output).expect("reparse"), &options);
    (output, reprinted)
}

#[test]
fn commenting_out_the_first_key_of_an_item_reads_back_in_place() {
    let (output, reprinted) =
        comment_out_and_reprint("list:\n- a: 1\n  b: 2\n- c: 3\n", "list[0].a");
    assert_eq!(output, "list:\n-\n  #a: 1\n  b: 2\n- c: 3\n");
    assert_eq!(reprinted, output);
}

#[test]
fn commenting_out_the_only_child_reads_back_in_place() {
    let (output, reprinted) = comment_out_and_reprint("a:\n  x: 1\nb: 2\n", "a.x");
    assert_eq!(output, "a: {}\n  #x: 1\nb: 2\n");
    assert_eq!(reprinted, output);

    let (output, reprinted) = comment_out_and_reprint("a:\n- x\nb: 2\n", "a[0]");
    assert_eq!(output, "a: []\n  #- x\nb: 2\n");
    assert_eq!(reprinted, output);
}
