// Integration tests (native) for the `birthday-show` crate.
// These tests avoid wasm-specific functionality and exercise the animation
// models and scene timeline so they can run under `cargo test` on the host.

use birthday_show::audio::Waveform;
use birthday_show::cake::CANDLE_COUNT;
use birthday_show::fireworks::{FireworkDisplay, Hsl, PRIMARY_BURST, SECONDARY_BURST};
use birthday_show::rng::XorShift64;
use birthday_show::scene::candle_tone;
use birthday_show::{Cue, Scene, Sequencer, ShowConfig, Trigger};

/// Step the sequencer every `step` ms up to `until`, collecting (time, cue).
fn run(seq: &mut Sequencer, from: u64, until: u64, step: u64) -> Vec<(u64, Cue)> {
    let mut out = Vec::new();
    let mut t = from;
    while t <= until {
        for c in seq.advance(t as f64) {
            out.push((t, c));
        }
        t += step;
    }
    out
}

fn scenes(cues: &[(u64, Cue)]) -> Vec<(u64, Scene)> {
    cues.iter()
        .filter_map(|(t, c)| match c {
            Cue::ShowScene(s) => Some((*t, *s)),
            _ => None,
        })
        .collect()
}

fn count(cues: &[(u64, Cue)], want: &Cue) -> usize {
    cues.iter().filter(|(_, c)| c == want).count()
}

#[test]
fn automatic_path_stops_at_cake() {
    let mut seq = Sequencer::new(ShowConfig::default());
    seq.trigger(Trigger::Start, 0.0);
    let cues = run(&mut seq, 0, 60_000, 10);
    assert_eq!(
        scenes(&cues),
        vec![
            (4_000, Scene::Countdown),
            (10_000, Scene::Birthday),
            (14_000, Scene::Cake)
        ]
    );
    assert_eq!(seq.current(), Some(Scene::Cake));
    assert_eq!(seq.pending_steps(), 0);
    // 21 rockets launched 300ms apart after the countdown
    assert_eq!(count(&cues, &Cue::LaunchFirework), 21);
    let launches: Vec<u64> = cues
        .iter()
        .filter(|(_, c)| *c == Cue::LaunchFirework)
        .map(|(t, _)| *t)
        .collect();
    assert_eq!(launches.first(), Some(&10_300));
    assert_eq!(launches.last(), Some(&16_300));
}

#[test]
fn full_show_visits_every_scene_once_in_order() {
    let mut seq = Sequencer::new(ShowConfig::default());
    seq.trigger(Trigger::Start, 0.0);
    run(&mut seq, 0, 15_000, 10);

    let blow = seq.trigger(Trigger::BlowCandles, 20_000.0);
    assert!(blow.contains(&Cue::CandlesBlown(CANDLE_COUNT)));
    let cues = run(&mut seq, 20_000, 40_000, 10);
    assert_eq!(
        scenes(&cues),
        vec![(22_500, Scene::Smile), (28_500, Scene::Letter)]
    );

    assert_eq!(seq.history(), &Scene::ALL);
    let idx: Vec<usize> = seq.history().iter().map(|s| s.index()).collect();
    assert!(idx.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn candles_go_out_one_by_one_with_falling_pitch() {
    let mut seq = Sequencer::new(ShowConfig::default());
    seq.trigger(Trigger::Start, 0.0);
    run(&mut seq, 0, 15_000, 10);

    let mut cues: Vec<(u64, Cue)> = seq
        .trigger(Trigger::BlowCandles, 15_000.0)
        .into_iter()
        .map(|c| (15_000, c))
        .collect();
    cues.extend(run(&mut seq, 15_001, 17_000, 1));

    let outs: Vec<(u64, usize)> = cues
        .iter()
        .filter_map(|(t, c)| match c {
            Cue::ExtinguishCandle(i) => Some((*t, *i)),
            _ => None,
        })
        .collect();
    assert_eq!(outs.len(), CANDLE_COUNT);
    for (n, (t, i)) in outs.iter().enumerate() {
        assert_eq!(*i, n);
        assert_eq!(*t, 15_000 + 100 * n as u64);
    }
    assert_eq!(count(&cues, &Cue::PlayTone(candle_tone(0))), 1);
    assert_eq!(candle_tone(18).freq_hz, 220.0);
    assert_eq!(candle_tone(18).waveform, Waveform::Sine);
}

#[test]
fn second_blow_is_a_no_op() {
    let mut seq = Sequencer::new(ShowConfig::default());
    seq.trigger(Trigger::Start, 0.0);
    run(&mut seq, 0, 15_000, 10);

    let mut cues: Vec<(u64, Cue)> = seq
        .trigger(Trigger::BlowCandles, 15_000.0)
        .into_iter()
        .map(|c| (15_000, c))
        .collect();
    assert!(!cues.is_empty());
    let pending = seq.pending_steps();
    assert!(seq.trigger(Trigger::BlowCandles, 15_000.0).is_empty());
    assert_eq!(seq.pending_steps(), pending);

    cues.extend(run(&mut seq, 15_010, 40_000, 10));
    assert!(seq.trigger(Trigger::BlowCandles, 40_000.0).is_empty());
    let outs = cues
        .iter()
        .filter(|(_, c)| matches!(c, Cue::ExtinguishCandle(_)))
        .count();
    assert_eq!(outs, CANDLE_COUNT);
    assert_eq!(
        scenes(&cues),
        vec![(17_500, Scene::Smile), (23_500, Scene::Letter)]
    );
}

#[test]
fn smile_and_letter_need_the_blow() {
    let mut seq = Sequencer::new(ShowConfig::default());
    seq.trigger(Trigger::Start, 0.0);
    run(&mut seq, 0, 120_000, 50);
    assert_eq!(seq.current(), Some(Scene::Cake));
    assert!(!seq.history().contains(&Scene::Smile));
    assert!(!seq.history().contains(&Scene::Letter));
    // the envelope lives in the letter scene
    assert!(seq.trigger(Trigger::OpenEnvelope, 120_000.0).is_empty());
}

fn times_of(cues: &[(u64, Cue)], want: &Cue) -> Vec<u64> {
    cues.iter()
        .filter(|(_, c)| c == want)
        .map(|(t, _)| *t)
        .collect()
}

#[test]
fn envelope_reveals_letter_and_celebrates() {
    let mut seq = Sequencer::new(ShowConfig::default());
    seq.trigger(Trigger::Start, 0.0);
    run(&mut seq, 0, 15_000, 10);
    seq.trigger(Trigger::BlowCandles, 15_000.0);
    run(&mut seq, 15_000, 30_000, 10);
    assert_eq!(seq.current(), Some(Scene::Letter));
    assert!(!seq.envelope_opened());

    let now = seq.trigger(Trigger::OpenEnvelope, 30_000.0);
    assert_eq!(now[0], Cue::OpenEnvelope);
    assert!(matches!(now[1], Cue::PlayTone(t) if t.freq_hz == 600.0));
    assert!(seq.envelope_opened());

    let later = run(&mut seq, 30_001, 32_999, 1);
    assert_eq!(times_of(&later, &Cue::RevealLetter), vec![30_500]);
    assert_eq!(
        times_of(&later, &Cue::LaunchFirework),
        (0..10).map(|i| 30_500 + 200 * i).collect::<Vec<u64>>()
    );
}

#[test]
fn reopening_the_envelope_celebrates_again() {
    let mut seq = Sequencer::new(ShowConfig::default());
    seq.trigger(Trigger::Start, 0.0);
    run(&mut seq, 0, 15_000, 10);
    seq.trigger(Trigger::BlowCandles, 15_000.0);
    run(&mut seq, 15_000, 30_000, 10);

    seq.trigger(Trigger::OpenEnvelope, 30_000.0);
    run(&mut seq, 30_001, 32_999, 1);

    let again = seq.trigger(Trigger::OpenEnvelope, 33_000.0);
    assert_eq!(again[0], Cue::OpenEnvelope);
    assert!(matches!(again[1], Cue::PlayTone(t) if t.freq_hz == 600.0));

    let later = run(&mut seq, 33_001, 36_000, 1);
    assert_eq!(times_of(&later, &Cue::RevealLetter), vec![33_500]);
    assert_eq!(
        times_of(&later, &Cue::LaunchFirework),
        (0..10).map(|i| 33_500 + 200 * i).collect::<Vec<u64>>()
    );
    assert_eq!(seq.current(), Some(Scene::Letter));
    assert_eq!(seq.history().len(), 6);
}

#[test]
fn custom_pacing_is_honoured() {
    let cfg = ShowConfig {
        heart_hold_ms: 1_000.0,
        countdown_from: 2,
        countdown_tick_ms: 250.0,
        ..ShowConfig::default()
    };
    let mut seq = Sequencer::new(cfg);
    seq.trigger(Trigger::Start, 0.0);
    let cues = run(&mut seq, 0, 3_000, 1);
    let values: Vec<(u64, u32)> = cues
        .iter()
        .filter_map(|(t, c)| match c {
            Cue::CountdownValue(v) => Some((*t, *v)),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec![(1_250, 2), (1_500, 1), (1_750, 0)]);
    assert_eq!(scenes(&cues)[1], (1_750, Scene::Birthday));
}

#[test]
fn explosion_bursts_primary_then_secondary() {
    let mut rng = XorShift64::seeded(2024);
    let mut d = FireworkDisplay::new(800.0, 600.0, 200.0);
    let color = Hsl::new(300.0, 100.0, 50.0);
    d.explode(&mut rng, 1_000.0, 100.0, 200.0, color);

    assert_eq!(d.particles().len(), PRIMARY_BURST);
    for p in d.particles() {
        assert_eq!((p.x, p.y), (100.0, 200.0));
        assert_eq!(p.color.to_string(), "hsl(300,100%,50%)");
        let s = p.speed();
        assert!((2.0 - 1e-9..8.0 + 1e-9).contains(&s), "speed {} out of range", s);
    }

    // not yet: 199ms later
    d.update(&mut rng, 1_199.0);
    assert_eq!(d.particles().len(), PRIMARY_BURST);
    assert_eq!(d.pending_bursts(), 1);

    // 200ms later the secondary wave joins, jittered around the apex
    let before = d.particles().len();
    d.update(&mut rng, 1_200.0);
    assert_eq!(d.pending_bursts(), 0);
    assert_eq!(d.particles().len(), before + SECONDARY_BURST);
    for p in &d.particles()[PRIMARY_BURST..] {
        // one physics step has been applied since spawning
        let (x0, y0) = (p.x - p.vx / 0.98, p.y - p.vy / 0.98);
        assert!((x0 - 100.0).abs() <= 25.0 + 1e-6, "x offset {}", x0 - 100.0);
        assert!((y0 - 200.0).abs() <= 25.0 + 1e-6, "y offset {}", y0 - 200.0);
        assert!((280.0..340.0).contains(&p.color.hue));
    }
}

#[test]
fn every_rocket_eventually_explodes() {
    let mut rng = XorShift64::seeded(99);
    let mut d = FireworkDisplay::new(1280.0, 720.0, 200.0);
    for _ in 0..21 {
        d.launch(&mut rng);
    }
    let mut bursts = 0;
    let mut t = 0.0;
    for _ in 0..200 {
        t += 16.0;
        bursts += d.update(&mut rng, t);
    }
    assert_eq!(bursts, 21);
    assert!(d.fireworks().is_empty());
}
