use cnx_parser::{load, serialize};

fn outline(source: &str) -> String {
    let tree = load(source).unwrap();
    tree.outline(tree.root())
}

fn round_trip(source: &str) -> (String, String) {
    let tree = load(source).unwrap();
    let again = load(&serialize(&tree)).unwrap();
    (tree.outline(tree.root()), again.outline(again.root()))
}

#[test]
fn test_plain_text_note_is_one_implicit_paragraph() {
    assert_eq!(
        outline("<note>plain text</note>"),
        r#"admonition[type=note](paragraph("plain text"))"#
    );
}

#[test]
fn test_block_note_keeps_its_paragraphs() {
    assert_eq!(
        outline("<note><para>x</para><para>y</para></note>"),
        r#"admonition[type=note](paragraph("x"), paragraph("y"))"#
    );
}

#[test]
fn test_leading_whitespace_does_not_make_content_inline() {
    assert_eq!(
        outline("<note>\n  <para>x</para>\n</note>"),
        r#"admonition[type=note](paragraph("x"))"#
    );
}

#[test]
fn test_leading_inline_tag_makes_content_inline() {
    assert_eq!(
        outline(r#"<note><emphasis effect="italics">Careful</emphasis> now</note>"#),
        r#"admonition[type=note](paragraph("Careful"{emphasis}, " now"))"#
    );
}

#[test]
fn test_trailing_block_after_inline_run_stays_inline() {
    // The first child decides for the whole element
    assert_eq!(
        outline("<commentary>Why <para>nested</para></commentary>"),
        r#"exercise_commentary(paragraph("Why ", paragraph("nested")))"#
    );
}

#[test]
fn test_empty_mixed_element_has_no_children() {
    assert_eq!(outline("<note/>"), "admonition[type=note]()");
}

#[test]
fn test_round_trip_exercise_document() {
    let source = r#"<document xmlns="http://cnx.rice.edu/cnxml">
  <content>
    <section id="s1">
      <title>Forces</title>
      <para id="p1">A <emphasis effect="underline">force</emphasis> is H<sub>2</sub>O<sup>*</sup>.</para>
      <exercise id="e1">
        <problem><para>Push?</para></problem>
        <solution><para>Yes.</para></solution>
        <commentary>Pushing is a force.</commentary>
      </exercise>
      <note type="tip"><list list-type="enumerated"><item>one</item><item>two</item></list></note>
      <figure id="f1">
        <subfigure><media alt="apple"><image src="apple.png"/></media></subfigure>
        <caption>An apple</caption>
      </figure>
    </section>
  </content>
</document>"#;

    let (first, second) = round_trip(source);
    assert_eq!(first, second);
    assert!(first.contains("exercise(exercise_problem"));
}

#[test]
fn test_round_trip_drops_unknown_markup_only() {
    let (first, second) = round_trip(
        r#"<section><para>kept</para><equation>lost</equation><para>kept <link url="x">lost</link></para></section>"#,
    );

    assert_eq!(first, r#"section(paragraph("kept"), paragraph("kept "))"#);
    assert_eq!(first, second);
}

#[test]
fn test_markup_ids_survive_round_trip() {
    let tree = load(r#"<section id="s1"><para id="p1">x</para></section>"#).unwrap();
    let markup = serialize(&tree);

    assert!(markup.contains(r#"<section id="s1">"#));
    assert!(markup.contains(r#"<para id="p1">x</para>"#));
}
