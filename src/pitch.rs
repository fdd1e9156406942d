//! Musical pitch arithmetic
//!
//! Stateless conversions between MIDI-style pitch numbers, sharp-spelled
//! letter notes, and frequencies. Pitch numbers are continuous: 69.0 is
//! A4 (440 Hz), each whole unit is one semitone, and fractional values
//! represent micro-tuned positions between notes.

use thiserror::Error;

/// The twelve pitch classes, sharp spellings only. Flats are not accepted.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Error from parsing a letter-octave note string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    /// The input is not a recognized note spelling followed by an octave.
    #[error("invalid note name: {0:?}")]
    InvalidNoteName(String),
}

/// MIDI pitch number for a frequency in Hz.
///
/// `12 * log2(4/55 * 2^0.75 * hz)`, which pins pitch 69 to 440 Hz. The
/// result is continuous; non-integer values are valid micro-tuned pitches.
pub fn pitch_from_freq(hz: f64) -> f64 {
    12.0 * (4.0 / 55.0 * 2.0_f64.powf(0.75) * hz).log2()
}

/// Frequency in Hz of a MIDI pitch number. Exact inverse of
/// [`pitch_from_freq`].
pub fn freq_from_pitch(pitch: f64) -> f64 {
    440.0 * 2.0_f64.powf((pitch - 69.0) / 12.0)
}

/// Letter-octave spelling of a pitch number, e.g. 60 -> "C4", 61 -> "C#4".
///
/// Non-integer pitches are rounded to the nearest note. MIDI 12 is "C0",
/// so MIDI 21 spells "A0" and MIDI 127 spells "G9"; pitches below 12 get
/// negative octaves ("C-1" for MIDI 0).
pub fn letter_from_pitch(pitch: f64) -> String {
    let rounded = pitch.round() as i64;
    let octave = (rounded - 12).div_euclid(12);
    let class = (rounded - 12).rem_euclid(12) as usize;
    format!("{}{}", NOTE_NAMES[class], octave)
}

/// Pitch number of a letter-octave note string, e.g. "C4" -> 60.
///
/// The leading letter (plus optional `#`) is split from the trailing,
/// possibly negative, octave integer. Inverse of [`letter_from_pitch`]
/// for every integer pitch.
pub fn pitch_from_letter(note: &str) -> Result<i64, NoteError> {
    let invalid = || NoteError::InvalidNoteName(note.to_string());

    let split = note
        .find(|c: char| c.is_ascii_digit() || c == '-')
        .ok_or_else(invalid)?;
    let (letter, octave) = note.split_at(split);

    let class = NOTE_NAMES
        .iter()
        .position(|&n| n == letter)
        .ok_or_else(invalid)?;
    let octave: i64 = octave.parse().map_err(|_| invalid())?;

    Ok(octave * 12 + class as i64 + 12)
}
