mod support;

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use piano::loader::{AssetLoader, LoadRequest, MP3, OGG, WAV, probe_format};
use piano::notes::{Note, SCALE};
use support::{FakeHost, shuffled};

fn request(timeout: Option<Duration>) -> LoadRequest<'static> {
    LoadRequest {
        base_path: Path::new("instruments"),
        voice: "piano",
        format: MP3,
        timeout,
    }
}

#[test]
fn probe_prefers_mp3_then_wav_then_ogg() {
    let all = FakeHost::playing(&["audio/ogg", "audio/wav", "audio/mpeg"]);
    assert_eq!(probe_format(&all), Some(MP3));
    assert_eq!(probe_format(&FakeHost::playing(&["audio/ogg", "audio/wav"])), Some(WAV));
    assert_eq!(probe_format(&FakeHost::playing(&["audio/ogg"])), Some(OGG));
    assert_eq!(probe_format(&FakeHost::playing(&["audio/flac"])), None);
}

#[test]
fn every_note_is_requested_up_front_in_scale_order() {
    let mut host = FakeHost::mp3();
    let (loader, clips) = AssetLoader::start(&mut host, &SCALE, &request(None), Instant::now());

    assert_eq!(clips.len(), 12);
    assert_eq!(loader.remaining(), 12);
    let expected: Vec<_> = SCALE
        .iter()
        .map(|n| Path::new("instruments/piano").join(format!("{}.mp3", n.name())))
        .collect();
    assert_eq!(host.requested, expected);
    assert_eq!(clips[5].path, expected[5]);
}

#[test]
fn completion_fires_once_after_the_last_signal_in_any_order() {
    for seed in 0..32 {
        let mut host = FakeHost::mp3();
        let t0 = Instant::now();
        let (mut loader, _clips) = AssetLoader::start(&mut host, &SCALE, &request(None), t0);

        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        loader
            .barrier_mut()
            .on_complete(move |_| counter.set(counter.get() + 1));

        let order = shuffled(SCALE.len(), seed);
        let (last, first_eleven) = order.split_last().expect("twelve ids");
        for &id in first_eleven {
            assert!(host.fire(id));
            assert_eq!(loader.poll(t0), None, "seed {seed}: completed early");
        }
        assert_eq!(fired.get(), 0);
        assert_eq!(loader.remaining(), 1);

        host.fire(*last);
        let report = loader.poll(t0).expect("twelfth signal completes");
        assert_eq!(report.ready.len(), 12);
        assert!(!report.is_degraded());
        assert_eq!(fired.get(), 1);

        assert!(!host.fire(*last));
        assert_eq!(loader.poll(t0), None);
        assert_eq!(fired.get(), 1);
    }
}

#[test]
fn signals_drained_in_one_poll_still_complete_once() {
    let mut host = FakeHost::mp3();
    let t0 = Instant::now();
    let (mut loader, _clips) = AssetLoader::start(&mut host, &SCALE, &request(None), t0);
    host.fire_all();
    assert!(loader.poll(t0).is_some());
    assert!(loader.poll(t0).is_none());
}

#[test]
fn deadline_completes_with_stalled_notes() {
    let mut host = FakeHost::mp3();
    let t0 = Instant::now();
    let timeout = Duration::from_secs(10);
    let (mut loader, _clips) = AssetLoader::start(&mut host, &SCALE, &request(Some(timeout)), t0);

    for id in 0..SCALE.len() {
        if SCALE[id] != Note::Eb {
            host.fire(id);
        }
    }
    assert_eq!(loader.poll(t0 + Duration::from_secs(9)), None);

    let report = loader
        .poll(t0 + timeout)
        .expect("deadline forces completion");
    assert_eq!(report.stalled, vec![Note::Eb]);
    assert_eq!(report.ready.len(), 11);

    host.fire(Note::Eb.position());
    assert_eq!(loader.poll(t0 + timeout * 2), None);
}

#[test]
fn without_a_deadline_a_stalled_load_waits_forever() {
    let mut host = FakeHost::mp3();
    let t0 = Instant::now();
    let (mut loader, _clips) = AssetLoader::start(&mut host, &SCALE, &request(None), t0);
    host.fire(0);
    assert_eq!(loader.poll(t0 + Duration::from_secs(3600)), None);
    assert_eq!(loader.remaining(), 11);
}
