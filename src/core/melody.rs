use super::constants::LOOP_TAIL_SEC;

/// One note of the fixed score.
///
/// Fields:
/// - `frequency_hz`: pitch in Hertz
/// - `duration_sec`: sounding length in seconds
/// - `onset_sec`: start offset from the beginning of a pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteEvent {
    pub frequency_hz: f32,
    pub duration_sec: f32,
    pub onset_sec: f32,
}

const fn note(frequency_hz: f32, duration_sec: f32, onset_sec: f32) -> NoteEvent {
    NoteEvent {
        frequency_hz,
        duration_sec,
        onset_sec,
    }
}

// Pitches used by the tune (key of C)
const G4: f32 = 392.00;
const A4: f32 = 440.00;
const B4: f32 = 493.88;
const C5: f32 = 523.25;
const D5: f32 = 587.33;
const E5: f32 = 659.25;
const F5: f32 = 698.46;
const G5: f32 = 783.99;

/// "Happy Birthday" in C, four phrases starting at 0, 6, 12 and 19 seconds.
pub const HAPPY_BIRTHDAY: &[NoteEvent] = &[
    // phrase 1
    note(G4, 0.4, 0.0),
    note(G4, 0.4, 0.5),
    note(A4, 0.8, 1.0),
    note(G4, 0.8, 2.0),
    note(C5, 0.8, 3.0),
    note(B4, 1.5, 4.0),
    // phrase 2
    note(G4, 0.4, 6.0),
    note(G4, 0.4, 6.5),
    note(A4, 0.8, 7.0),
    note(G4, 0.8, 8.0),
    note(D5, 0.8, 9.0),
    note(C5, 1.5, 10.0),
    // phrase 3
    note(G4, 0.4, 12.0),
    note(G4, 0.4, 12.5),
    note(G5, 0.8, 13.0),
    note(E5, 0.8, 14.0),
    note(C5, 0.8, 15.0),
    note(B4, 0.8, 16.0),
    note(A4, 1.5, 17.0),
    // phrase 4
    note(F5, 0.4, 19.0),
    note(F5, 0.4, 19.5),
    note(E5, 0.8, 20.0),
    note(C5, 0.8, 21.0),
    note(D5, 0.8, 22.0),
    note(C5, 2.0, 23.0),
];

/// Ordered, immutable note table driving the sequencer.
#[derive(Clone, Copy, Debug)]
pub struct MelodyScore {
    notes: &'static [NoteEvent],
}

impl Default for MelodyScore {
    fn default() -> Self {
        Self::happy_birthday()
    }
}

impl MelodyScore {
    pub const fn happy_birthday() -> Self {
        Self {
            notes: HAPPY_BIRTHDAY,
        }
    }

    pub fn notes(&self) -> &'static [NoteEvent] {
        self.notes
    }

    /// Time at which the last note finishes sounding.
    pub fn span_sec(&self) -> f64 {
        self.notes
            .iter()
            .map(|n| n.onset_sec as f64 + n.duration_sec as f64)
            .fold(0.0, f64::max)
    }

    /// Spacing between loop passes: the span plus a short tail, rounded up to
    /// whole seconds. Derived from the table, never configured separately.
    pub fn loop_period_sec(&self) -> f64 {
        (self.span_sec() + LOOP_TAIL_SEC).ceil()
    }
}
