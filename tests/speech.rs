//! Speech pipeline integration tests
//!
//! Tests speech components without requiring audio hardware or network.

use solace::speech::{SAMPLE_RATE, samples_to_wav, save_audio, scripted_reply, wants_stop};

/// Generate sine wave audio samples
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

#[test]
fn wav_encoding_produces_parseable_header() {
    let samples = generate_sine_samples(440.0, 0.5, 0.3);
    let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.len(), u32::try_from(samples.len()).unwrap());
}

#[test]
fn wav_encoding_of_silence() {
    let wav = samples_to_wav(&[0.0; 1600], SAMPLE_RATE).unwrap();
    let mut reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
    assert!(reader.samples::<i16>().all(|s| s.unwrap() == 0));
}

#[test]
fn saved_audio_uses_timestamped_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = save_audio(dir.path(), b"not really mp3").unwrap();

    let name = path.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("reflection_"), "{name}");
    assert!(name.ends_with(".mp3"), "{name}");
    // reflection_YYYY-MM-DD_HH-MM-SS.mp3
    assert_eq!(name.len(), "reflection_0000-00-00_00-00-00.mp3".len());
    assert_eq!(std::fs::read(&path).unwrap(), b"not really mp3");
}

#[test]
fn save_audio_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("responses");
    let path = save_audio(&nested, b"audio").unwrap();
    assert!(path.starts_with(&nested));
}

#[test]
fn scripted_replies_cover_keywords() {
    assert!(scripted_reply("hello there").starts_with("Hello there!"));
    assert!(scripted_reply("how are you today").contains("doing great"));
    assert!(scripted_reply("okay goodbye").starts_with("Goodbye!"));
    assert!(scripted_reply("please stop").starts_with("Stopping"));
}

#[test]
fn stop_replies_also_arm_termination() {
    // A stop command both produces the stop reply and trips the stop check
    let input = "please stop now";
    assert!(wants_stop(input));
    assert!(scripted_reply(input).contains("Stopping"));

    // The farewell path does the same
    let farewell = "bye for now";
    assert!(wants_stop(farewell));
    assert!(scripted_reply(farewell).starts_with("Goodbye"));
}
