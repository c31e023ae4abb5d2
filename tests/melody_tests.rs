// Host-side tests for the score table.

use cake_web::core::constants::LOOP_TAIL_SEC;
use cake_web::core::{MelodyScore, HAPPY_BIRTHDAY};

#[test]
fn score_is_the_fixed_table() {
    let score = MelodyScore::default();
    assert_eq!(score.notes(), HAPPY_BIRTHDAY);
    assert_eq!(score.notes().len(), 25);
}

#[test]
fn notes_are_ordered_and_well_formed() {
    let notes = MelodyScore::happy_birthday().notes();
    for n in notes {
        assert!(n.frequency_hz > 0.0);
        assert!(n.duration_sec > 0.0);
        assert!(n.onset_sec >= 0.0);
    }
    for pair in notes.windows(2) {
        assert!(pair[0].onset_sec < pair[1].onset_sec);
    }
    assert_eq!(notes[0].onset_sec, 0.0);
}

#[test]
fn phrases_start_on_schedule() {
    let notes = MelodyScore::happy_birthday().notes();
    let onsets: Vec<f32> = notes.iter().map(|n| n.onset_sec).collect();
    for phrase in [0.0, 6.0, 12.0, 19.0] {
        assert!(onsets.contains(&phrase), "no note at {phrase}s");
    }
    // Every phrase opens with a repeated short pickup note
    for start in [0, 6, 12, 19] {
        let i = onsets.iter().position(|&o| o == start as f32).unwrap();
        assert_eq!(notes[i].frequency_hz, notes[i + 1].frequency_hz);
        assert!(notes[i].duration_sec < 0.5);
    }
}

#[test]
fn loop_period_covers_the_whole_score() {
    let score = MelodyScore::happy_birthday();
    assert_eq!(score.span_sec(), 25.0);
    assert_eq!(score.loop_period_sec(), 26.0);
    assert!(score.span_sec() + LOOP_TAIL_SEC <= score.loop_period_sec());
    assert_eq!(score.loop_period_sec().fract(), 0.0);
}
