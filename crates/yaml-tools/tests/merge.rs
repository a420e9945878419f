use commented_yaml::{Document, NodeKind, PrintOptions, parse_document, print_document};
use pretty_assertions::assert_eq;
use yaml_tools::{Error, NodePath, successive_merge};

const SCALAR_1: &str = "test: 1\n";
const SCALAR_2: &str = "test: 2\n";
const DICT_1: &str = "test:\n  foo: 1\n  bar: 2\n";
const DICT_2: &str = "test:\n  foobar: babar\n";
const LIST_1: &str = "test:\n- item1\n- item2\n";
const LIST_2: &str = "test:\n- item3\n";
const NONE: &str = "";

fn documents(contents: &[&str]) -> Vec<Document> {
    contents
        .iter()
        .map(|content| parse_document(content).expect("parse"))
        .collect()
}

fn merged(contents: &[&str]) -> String {
    let document = successive_merge(documents(contents)).expect("merge");
    print_document(&document, &PrintOptions::default())
}

fn mismatch(contents: &[&str]) -> Error {
    successive_merge(documents(contents)).expect_err("type mismatch")
}

#[test]
fn scalar_into_scalar() {
    assert_eq!(merged(&[SCALAR_1, SCALAR_2]), SCALAR_2);
}

#[test]
fn scalar_into_mapping_fails() {
    assert_eq!(
        mismatch(&[DICT_1, SCALAR_2]),
        Error::TypeMismatch {
            path: NodePath::parse("test"),
            src: NodeKind::Scalar,
            dest: NodeKind::Mapping,
        }
    );
}

#[test]
fn scalar_into_sequence_is_appended() {
    assert_eq!(merged(&[LIST_1, SCALAR_2]), "test:\n- item1\n- item2\n- 2\n");
}

#[test]
fn scalar_into_empty_document() {
    assert_eq!(merged(&[NONE, SCALAR_2]), SCALAR_2);
}

#[test]
fn mapping_into_scalar_fails() {
    assert_eq!(
        mismatch(&[SCALAR_1, DICT_2]),
        Error::TypeMismatch {
            path: NodePath::parse("test"),
            src: NodeKind::Mapping,
            dest: NodeKind::Scalar,
        }
    );
}

#[test]
fn mapping_into_mapping() {
    assert_eq!(
        merged(&[DICT_1, DICT_2]),
        "test:\n  foo: 1\n  bar: 2\n  foobar: babar\n"
    );
}

#[test]
fn mapping_into_sequence_fails() {
    assert_eq!(
        mismatch(&[LIST_1, DICT_2]),
        Error::TypeMismatch {
            path: NodePath::parse("test"),
            src: NodeKind::Mapping,
            dest: NodeKind::Sequence,
        }
    );
}

#[test]
fn mapping_into_empty_document() {
    assert_eq!(merged(&[NONE, DICT_2]), DICT_2);
}

#[test]
fn sequence_into_scalar_takes_the_scalar_last() {
    assert_eq!(merged(&[SCALAR_1, LIST_2]), "test:\n- item3\n- 1\n");
}

#[test]
fn sequence_into_mapping_fails() {
    assert_eq!(
        mismatch(&[DICT_1, LIST_2]),
        Error::TypeMismatch {
            path: NodePath::parse("test"),
            src: NodeKind::Sequence,
            dest: NodeKind::Mapping,
        }
    );
}

#[test]
fn sequence_into_sequence() {
    assert_eq!(
        merged(&[LIST_1, LIST_2]),
        "test:\n- item1\n- item2\n- item3\n"
    );
}

#[test]
fn sequence_into_empty_value() {
    assert_eq!(merged(&["test: ", LIST_2]), LIST_2);
}

#[test]
fn empty_document_into_anything() {
    assert_eq!(merged(&[NONE, NONE]), NONE);
    for content in [SCALAR_1, DICT_1, LIST_1] {
        assert_eq!(merged(&[content, NONE]), content);
    }
}

#[test]
fn type_mismatch_message_names_the_path() {
    let error = mismatch(&[DICT_1, LIST_2]);
    assert_eq!(
        error.to_string(),
        "cannot merge a sequence into a mapping at test"
    );
}

#[test]
fn three_documents_with_comments() {
    let out = merged(&[
        "#comment1
test:
  foo: 1 #comment1
  #ninja-comment1
  bar: 1
",
        "test:
  #ninja-comment2
  foo: 2
",
        "test:
  bar: 3 #comment3
  foobar: 3 #comment3
  #ninja-comment3
",
    ]);
    // `#ninja-comment1` stays above `bar`: the later `bar` carries no comment,
    // and a missing comment never erases an existing one.
    insta::assert_snapshot!(out, @r"
    #comment1
    test:
      #ninja-comment2
      foo: 2 #comment1
      #ninja-comment1
      bar: 3 #comment3
      foobar: 3 #comment3
      #ninja-comment3
    ");
}

#[test]
fn later_documents_win_and_sequences_accumulate() {
    let out = merged(&[
        "# base\nname: app\nports:\n- 80 # http\nenv:\n  debug: false\n",
        "ports:\n- 443\nenv:\n  debug: true # staging only\n",
        "ports:\n- 8080\nenv:\n  region: eu\n",
    ]);
    insta::assert_snapshot!(out, @r"
    # base
    name: app
    ports:
    - 80 # http
    - 443
    - 8080
    env:
      debug: true # staging only
      region: eu
    ");
}

#[test]
fn flow_sequences_stay_flow() {
    assert_eq!(
        merged(&["tags: [a, b]\n", "tags: [c]\n"]),
        "tags: [a, b, c]\n"
    );
}

#[test]
fn no_documents() {
    assert_eq!(successive_merge(Vec::new()), Err(Error::NoDocuments));
}
