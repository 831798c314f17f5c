//! Property-based tests for windows
//!
//! These tests use proptest to check the read, seek and tell contracts of
//! windows over randomly generated sources, for both memory and file backing.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{Seek, SeekFrom, Write};
use substream::{FileResource, MemoryResource, Whence, Window};
use tempfile::NamedTempFile;

/// Source bytes plus a window `(offset, length)` that fits inside them
fn source_and_window() -> impl Strategy<Value = (Vec<u8>, u64, u64)> {
    prop::collection::vec(any::<u8>(), 0..512).prop_flat_map(|data| {
        let len = data.len() as u64;
        (Just(data), 0..=len).prop_flat_map(move |(data, offset)| {
            (Just(data), Just(offset), 0..=(len - offset))
        })
    })
}

fn file_with(data: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(data).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

proptest! {
    /// Property: a fresh window reads exactly the requested slice of a memory source
    #[test]
    fn prop_memory_window_matches_slice((data, offset, length) in source_and_window()) {
        let mut resource = MemoryResource::new(data.clone());
        let mut window = Window::from_resource(&mut resource, offset, length).unwrap();

        let got = window.read(length as usize).unwrap();
        prop_assert_eq!(&got[..], &data[offset as usize..(offset + length) as usize]);
        prop_assert!(window.eof());
    }

    /// Property: a fresh window reads exactly the requested slice of a file source
    #[test]
    fn prop_file_window_matches_slice((data, offset, length) in source_and_window()) {
        let temp_file = file_with(&data);
        let mut resource = FileResource::open(temp_file.path()).unwrap();
        let mut window = Window::from_resource(&mut resource, offset, length).unwrap();

        let got = window.read(length as usize).unwrap();
        prop_assert_eq!(&got[..], &data[offset as usize..(offset + length) as usize]);
    }

    /// Property: seek(x, Start) then seek(0, Current) leaves tell() unchanged
    #[test]
    fn prop_seek_tell_round_trip(
        (data, offset, length) in source_and_window(),
        fraction in 0.0f64..1.0,
    ) {
        prop_assume!(length > 0);
        let mut resource = MemoryResource::new(data);
        let mut window = Window::from_resource(&mut resource, offset, length).unwrap();

        let x = ((length as f64 * fraction) as u64).min(length - 1) as i64;
        prop_assert!(window.seek(x, Whence::Start));
        let p1 = window.tell();
        prop_assert!(window.seek(0, Whence::Current));
        let p2 = window.tell();
        prop_assert_eq!(p1, p2);
        prop_assert_eq!(p1, Some(x as u64));
        prop_assert_eq!(window.tell(), p2);
    }

    /// Property: the last byte is seekable, one past it is not
    #[test]
    fn prop_seek_boundary((data, offset, length) in source_and_window()) {
        let mut resource = MemoryResource::new(data);
        let mut window = Window::from_resource(&mut resource, offset, length).unwrap();

        prop_assert!(!window.seek(length as i64, Whence::Start));
        if length > 0 {
            prop_assert!(window.seek(length as i64 - 1, Whence::Start));
        }
    }

    /// Property: a rejected seek never moves the position
    #[test]
    fn prop_failed_seek_keeps_position(
        (data, offset, length) in source_and_window(),
        delta in any::<i64>(),
    ) {
        let mut resource = MemoryResource::new(data);
        let mut window = Window::from_resource(&mut resource, offset, length).unwrap();
        let before = window.tell();

        if !window.seek(delta, Whence::Current) {
            prop_assert_eq!(window.tell(), before);
        }
    }

    /// Property: opening a snapshot window restores the source position
    #[test]
    fn prop_snapshot_restores_position(
        (data, offset, length) in source_and_window(),
        position in 0u64..1024,
    ) {
        let mut resource = MemoryResource::new(data);
        resource.seek(SeekFrom::Start(position)).unwrap();

        let _window = Window::from_resource(&mut resource, offset, length).unwrap();
        prop_assert_eq!(resource.position(), position);
    }

    /// Property: size is fixed at the requested length
    #[test]
    fn prop_stat_is_length((data, offset, length) in source_and_window()) {
        let mut resource = MemoryResource::new(data);
        let mut window = Window::from_resource(&mut resource, offset, length).unwrap();

        prop_assert_eq!(window.stat().size, length);
        let _ = window.read(7).unwrap();
        prop_assert_eq!(window.stat().size, length);
        window.close();
        prop_assert_eq!(window.stat().size, length);
    }
}

/// Randomised chunked reads reassemble the whole window
#[test]
fn test_random_chunked_reads() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let data: Vec<u8> = (0..4096).map(|_| rng.random()).collect();

    for _ in 0..50 {
        let offset = rng.random_range(0..data.len() as u64);
        let length = rng.random_range(0..=(data.len() as u64 - offset));
        let mut resource = MemoryResource::new(data.clone());
        let mut window = Window::from_resource(&mut resource, offset, length).unwrap();

        let mut collected = Vec::new();
        loop {
            let chunk = window.read(rng.random_range(1..64)).unwrap();
            if chunk.is_empty() {
                break;
            }
            collected.extend_from_slice(&chunk);
        }
        assert_eq!(collected, &data[offset as usize..(offset + length) as usize]);
        assert!(window.eof());
    }
}
