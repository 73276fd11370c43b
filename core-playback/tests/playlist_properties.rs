//! Invariant checks over long, pseudo-random operation sequences.

use bridge_traits::storage::ResourceLocator;
use core_playback::{Playlist, TrackId, TrackRecord};

/// Small deterministic generator so failures are reproducible.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

fn track(n: usize) -> TrackRecord {
    TrackRecord::new(
        format!("t{n}.mp3"),
        ResourceLocator::new(format!("blob:{n}")),
        1,
        "audio/mpeg",
    )
}

fn assert_selection_valid(playlist: &Playlist) {
    match playlist.current_index() {
        None => {}
        Some(index) => assert!(
            index < playlist.len(),
            "current index {index} out of bounds for {} tracks",
            playlist.len()
        ),
    }
    if playlist.is_empty() {
        assert_eq!(playlist.current_index(), None);
    }
}

#[test]
fn selection_stays_valid_across_random_operations() {
    for seed in 1..=50u64 {
        let mut rng = XorShift(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let mut playlist = Playlist::new();
        let mut created = 0;

        for _ in 0..400 {
            match rng.below(5) {
                0 | 1 => {
                    playlist.push(track(created));
                    created += 1;
                    if playlist.current_index().is_none() {
                        playlist.select(0).unwrap();
                    }
                }
                2 if !playlist.is_empty() => {
                    let index = rng.below(playlist.len());
                    let before = playlist.current_index();
                    let current_id = playlist.current_id();
                    let removal = playlist.remove(index).unwrap();

                    match before {
                        Some(cur) if cur == index => {
                            assert!(removal.was_current);
                            if !playlist.is_empty() {
                                assert_eq!(
                                    playlist.current_index(),
                                    Some(index.min(playlist.len() - 1))
                                );
                            }
                        }
                        Some(cur) if cur > index => {
                            assert_eq!(playlist.current_index(), Some(cur - 1));
                            assert_eq!(playlist.current_id(), current_id);
                        }
                        _ => assert_eq!(playlist.current_id(), current_id),
                    }
                }
                3 => {
                    if let Some(index) = playlist.next_index() {
                        playlist.select(index).unwrap();
                    }
                }
                _ => {
                    if let Some(index) = playlist.previous_index() {
                        playlist.select(index).unwrap();
                    }
                }
            }
            assert_selection_valid(&playlist);
        }
    }
}

#[test]
fn next_then_previous_returns_to_start() {
    for len in 2..8 {
        let mut playlist = Playlist::new();
        for n in 0..len {
            playlist.push(track(n));
        }
        for start in 0..len {
            playlist.select(start).unwrap();
            let next = playlist.next_index().unwrap();
            playlist.select(next).unwrap();
            let back = playlist.previous_index().unwrap();
            assert_eq!(back, start, "len {len}, start {start}");

            playlist.select(start).unwrap();
            let prev = playlist.previous_index().unwrap();
            playlist.select(prev).unwrap();
            assert_eq!(playlist.next_index().unwrap(), start);
        }
    }
}

#[test]
fn removal_never_changes_identity_of_other_tracks() {
    let mut playlist = Playlist::new();
    for n in 0..6 {
        playlist.push(track(n));
    }
    let ids: Vec<TrackId> = playlist.tracks().iter().map(|t| t.id).collect();

    playlist.remove(3).unwrap();
    playlist.remove(0).unwrap();

    let remaining: Vec<TrackId> = playlist.tracks().iter().map(|t| t.id).collect();
    assert_eq!(remaining, vec![ids[1], ids[2], ids[4], ids[5]]);
}
