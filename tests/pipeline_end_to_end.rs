use std::fs;

use tunestep::config::Config;
use tunestep::pipeline::{corpus, sequences};
use tunestep::vocab::Mapping;

fn score_partwise(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Melody</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
{body}
    </measure>
  </part>
</score-partwise>"#
    )
}

/// One C4 quarter note in C major.
fn song_a() -> String {
    score_partwise(
        r#"      <attributes>
        <divisions>4</divisions>
        <key><fifths>0</fifths><mode>major</mode></key>
      </attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration></note>"#,
    )
}

/// One eighth rest, no key signature.
fn song_b() -> String {
    score_partwise(
        r#"      <attributes>
        <divisions>4</divisions>
      </attributes>
      <note><rest/><duration>2</duration></note>"#,
    )
}

/// A dotted-eighth note: 3/8 quarter lengths, outside the allowed set.
fn song_filtered() -> String {
    score_partwise(
        r#"      <attributes>
        <divisions>8</divisions>
        <key><fifths>0</fifths><mode>major</mode></key>
      </attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>3</duration></note>"#,
    )
}

/// A declared dorian melody, which has no canonical tonic.
fn song_modal() -> String {
    score_partwise(
        r#"      <attributes>
        <divisions>4</divisions>
        <key><fifths>0</fifths><mode>dorian</mode></key>
      </attributes>
      <note><pitch><step>D</step><octave>4</octave></pitch><duration>4</duration></note>"#,
    )
}

fn test_config(dir: &std::path::Path, sequence_length: usize) -> Config {
    Config {
        dataset_dir: dir.join("scores"),
        encoded_dir: dir.join("dataset"),
        corpus_path: dir.join("file_dataset.txt"),
        mapping_path: dir.join("mapping.json"),
        sequence_length,
        ..Config::default()
    }
}

#[test]
fn two_song_corpus_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path(), 2);
    fs::create_dir_all(&config.dataset_dir).expect("mkdir");
    fs::write(config.dataset_dir.join("a.musicxml"), song_a()).expect("write a");
    fs::write(config.dataset_dir.join("b.musicxml"), song_b()).expect("write b");

    let summary = corpus::build(&config).expect("build");
    assert_eq!(summary.accepted(), 2);
    assert_eq!(summary.excluded, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.songs["a"], "60 _ _ _");
    assert_eq!(summary.songs["b"], "rest _");

    // Per-song artifacts landed next to each other, keyed by id.
    assert_eq!(
        fs::read_to_string(config.encoded_dir.join("a.txt")).expect("artifact a"),
        "60 _ _ _"
    );
    assert_eq!(
        fs::read_to_string(config.encoded_dir.join("b.txt")).expect("artifact b"),
        "rest _"
    );

    let text = corpus::assemble(&summary, config.sequence_length, &config.corpus_path)
        .expect("assemble");
    assert_eq!(text, "60 _ _ _ / / rest _ / /");

    let mapping = Mapping::build(&text);
    assert_eq!(mapping.len(), 4);
    mapping.save(&config.mapping_path).expect("save mapping");
    let reloaded = Mapping::load(&config.mapping_path).expect("load mapping");
    assert_eq!(reloaded, mapping);

    let data = sequences::generate(&text, &mapping, config.sequence_length).expect("generate");
    // 10 tokens, window 2: 8 samples, one-hot over 4 classes.
    assert_eq!(data.inputs.dims(), &[8, 2, 4]);
    assert_eq!(data.targets.dims(), &[8]);

    // Codes in lexicographic order: "/" 0, "60" 1, "_" 2, "rest" 3.
    let targets = data.targets.to_vec1::<u32>().expect("targets");
    assert_eq!(targets, vec![2, 2, 0, 0, 3, 2, 0, 0]);
}

#[test]
fn bad_scores_are_counted_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path(), 2);
    fs::create_dir_all(&config.dataset_dir).expect("mkdir");
    fs::write(config.dataset_dir.join("good.musicxml"), song_a()).expect("write");
    fs::write(config.dataset_dir.join("dotted.musicxml"), song_filtered()).expect("write");
    fs::write(config.dataset_dir.join("modal.musicxml"), song_modal()).expect("write");
    fs::write(config.dataset_dir.join("broken.xml"), "<score-partwise>").expect("write");

    let summary = corpus::build(&config).expect("build");
    assert_eq!(summary.accepted(), 1);
    assert_eq!(summary.excluded, 1); // the dotted eighth
    assert_eq!(summary.failed, 2); // dorian + malformed XML
    assert!(summary.songs.contains_key("good"));
}

#[test]
fn nested_directories_yield_stable_sorted_ids() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path(), 1);
    let nested = config.dataset_dir.join("erk");
    fs::create_dir_all(&nested).expect("mkdir");
    fs::write(nested.join("tune.musicxml"), song_a()).expect("write");
    fs::write(config.dataset_dir.join("b.musicxml"), song_b()).expect("write");

    let summary = corpus::build(&config).expect("build");
    let ids: Vec<&String> = summary.songs.keys().collect();
    assert_eq!(ids, ["b", "erk_tune"]);

    let text =
        corpus::assemble(&summary, config.sequence_length, &config.corpus_path).expect("assemble");
    assert_eq!(text, "rest _ / 60 _ _ _ /");
}
